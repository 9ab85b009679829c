//! 数据模型模块

pub mod auth;
pub mod category;
pub mod product;
pub mod quote;
pub mod user;
