//! Quill Back-Office Server - 文具店后台管理服务
//!
//! # 架构概述
//!
//! 本模块是后台服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储（模型 + 仓储）
//! - **工作流** (`services`): 销售/退货引擎与库存对账
//! - **审计** (`audit`): SHA-256 哈希链审计日志
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! backoffice-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── db/            # 数据库层（models + repository）
//! ├── services/      # 销售/退货工作流引擎
//! ├── audit/         # 审计日志
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod audit;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____        _ ____
  / __ \__  __(_) / /
 / / / / / / / / / /
/ /_/ / /_/ / / / /
\___\_\__,_/_/_/_/
    Back-Office Server
    "#
    );
}
