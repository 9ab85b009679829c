//! Senteng Fashions 后端库
//! 商品目录、报价单与认证

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod slug;
pub mod telemetry;
