/// 带冲突检测的写操作结果
///
/// 冲突在任何写入之前计算；`Conflicted` 表示未做任何修改。
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome<T, C> {
    Applied(T),
    Conflicted(Vec<C>),
}

impl<T, C> GuardOutcome<T, C> {
    pub fn is_conflicted(&self) -> bool {
        matches!(self, GuardOutcome::Conflicted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GuardOutcome<U, C> {
        match self {
            GuardOutcome::Applied(value) => GuardOutcome::Applied(f(value)),
            GuardOutcome::Conflicted(conflicts) => GuardOutcome::Conflicted(conflicts),
        }
    }
}
