use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+(\.[A-Za-z]{2,})?$").expect("Invalid email regex")
});

// 学号：字母数字，允许 . - /
static RGM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9./-]{0,31}$").expect("Invalid rgm regex"));

// 开课代码
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._/-]{0,63}$").expect("Invalid code regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 255 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > 255 {
        return Err("Name must be between 1 and 255 characters");
    }
    Ok(())
}

pub fn validate_rgm(rgm: &str) -> Result<(), &'static str> {
    if !RGM_RE.is_match(rgm) {
        return Err("RGM must be 1-32 letters, digits, '.', '-' or '/'");
    }
    Ok(())
}

pub fn validate_offering_code(code: &str) -> Result<(), &'static str> {
    if !CODE_RE.is_match(code) {
        return Err("Offering code must be 1-64 letters, digits, spaces, '.', '_', '/' or '-'");
    }
    Ok(())
}

/// 小组标题可以为空（由系统生成默认标题），非空时限制长度
pub fn validate_group_title(title: &str) -> Result<(), &'static str> {
    if title.chars().count() > 255 {
        return Err("Group title must be at most 255 characters");
    }
    Ok(())
}

/// 密码策略：至少 8 个字符，同时包含字母和数字
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if ["12345678", "password1", "senha123", "admin123"]
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// 返回合并后的错误信息，便于直接放入响应
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    validate_password(password).map_err(|errors| errors.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("ana@fatec.sp.gov.br").is_ok());
        assert!(validate_email("admin@localhost").is_ok());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("ana@").is_err());
    }

    #[test]
    fn test_rgm() {
        assert!(validate_rgm("0001").is_ok());
        assert!(validate_rgm("2023.1-77").is_ok());
        assert!(validate_rgm("").is_err());
        assert!(validate_rgm(" 0001").is_err());
        assert!(validate_rgm("a;b").is_err());
    }

    #[test]
    fn test_offering_code() {
        assert!(validate_offering_code("TGI-2025/1").is_ok());
        assert!(validate_offering_code("").is_err());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name("Maria").is_ok());
        assert!(validate_full_name("   ").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Segredo123").is_ok());
        assert!(validate_password("abc1").is_err());
        assert!(validate_password("abcdefgh").is_err());
        assert!(validate_password("12345678").is_err());
        assert_eq!(
            validate_password_simple("Password1").unwrap_err(),
            "Password is too common, please choose a stronger password"
        );
    }
}
