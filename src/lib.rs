//! Gradebook - 作业提交与成绩对账服务
//!
//! 基于 Actix Web 与 SeaORM 构建：教师布置作业，学生在截止前提交，
//! 教师评分后可按作业生成提交对账报告，并计算学生的加权总评。
//!
//! # 架构
//! - `access`: 班级成员关系驱动的访问检查
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `events`: 通知与审计事件的异步分发
//! - `grade_math`: 等级换算与成绩统计
//! - `middlewares`: 认证中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod access;
pub mod config;
pub mod entity;
pub mod errors;
pub mod events;
pub mod grade_math;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
