use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;
use tokio::sync::mpsc;

use crate::audit::{AuditAction, AuditLogRequest, AuditService, AuditWorker};
use crate::core::Config;
use crate::db::DbService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是服务的核心数据结构。使用 Arc 实现浅拷贝，
/// 所有 axum handler 通过 `State<ServerState>` 获取。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | audit | Option<Arc<AuditService>> | 审计服务 (可禁用) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库
    pub db: Surreal<Db>,
    /// 审计服务 (None 表示禁用)
    pub audit: Option<Arc<AuditService>>,
    /// 审计 worker 的接收端，start_background_tasks 取走
    audit_rx: Arc<Mutex<Option<mpsc::Receiver<AuditLogRequest>>>>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        audit: Option<Arc<AuditService>>,
        audit_rx: Option<mpsc::Receiver<AuditLogRequest>>,
    ) -> Self {
        Self {
            config,
            db,
            audit,
            audit_rx: Arc::new(Mutex::new(audit_rx)),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/quill.db)
    /// 3. 审计服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("quill.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let (audit, audit_rx) = if config.enable_audit_log {
            let (service, rx) = AuditService::new(db.clone(), config.audit_buffer_size);
            (Some(service), Some(rx))
        } else {
            (None, None)
        };

        Self::new(config.clone(), db, audit, audit_rx)
    }

    /// 内存数据库状态 (测试用)
    pub async fn in_memory(config: Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::new(config, db_service.db, None, None)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用。启动的任务：
    /// - 审计日志 worker
    pub async fn start_background_tasks(&self) {
        if let Some(audit) = &self.audit {
            if let Some(rx) = self.audit_rx.lock().await.take() {
                let worker = AuditWorker::new(audit.storage());
                tokio::spawn(worker.run(rx));
            }
            audit
                .log_sync(
                    AuditAction::SystemStartup,
                    "system",
                    "server:main",
                    serde_json::json!({ "environment": self.config.environment }),
                )
                .await;
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 记录一条审计日志 (禁用时为空操作)
    pub fn audit_log(
        &self,
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        details: serde_json::Value,
    ) {
        if let Some(audit) = &self.audit {
            audit.log(AuditLogRequest {
                action,
                resource_type: resource_type.to_string(),
                resource_id: resource_id.to_string(),
                operator_id: None,
                operator_name: None,
                details,
            });
        }
    }
}
