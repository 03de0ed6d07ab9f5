//! TGI System - 毕业设计（TGI）小组管理后端服务
//!
//! 基于 Actix Web 构建：小组成员对账、评分汇总、开课归属、海报评价、批量导入与报表导出。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与请求 ID 中间件
//! - `models`: 数据模型定义与纯计算规则（对账、归属、评分）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
