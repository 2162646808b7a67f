////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - service trait: 对外提供的功能
//    - service: 业务逻辑(基于repository)
//
//////////////////////////////////////////////////////////////////////

pub mod account;
pub mod admin;
pub mod catalog;
pub mod interaction;
pub mod ledger;
pub mod notify;

use database::Database;
use std::sync::Arc;
use tracing::info;
use utils::AppConfig;

use account::account_service::{AccountService, DynAccountService};
use admin::admin_service::{AdminService, DynAdminService};
use catalog::catalog_service::{CatalogService, DynCatalogService};
use interaction::interaction_service::{DynInteractionService, InteractionService};
use ledger::ledger_service::{DynLedgerService, LedgerService};
use notify::{DynNotifier, NotifierHandle};

#[derive(Clone)]
pub struct Services {
    pub account: DynAccountService,
    pub ledger: DynLedgerService,
    pub catalog: DynCatalogService,
    pub interaction: DynInteractionService,
    pub admin: DynAdminService,
    pub notifier: NotifierHandle,
    pub config: Arc<AppConfig>,
    pub database: Arc<Database>,
}

impl Services {
    pub fn new(db: Database, config: Arc<AppConfig>) -> Self {
        let database = Arc::new(db);
        // The gateway registers the real notifier later, once it exists.
        let notifier = NotifierHandle::noop();

        let account = Arc::new(AccountService::new(database.clone(), config.clone())) as DynAccountService;
        let ledger = Arc::new(LedgerService::new(database.clone())) as DynLedgerService;
        let catalog =
            Arc::new(CatalogService::new(database.clone(), config.clone(), notifier.clone())) as DynCatalogService;
        let interaction = Arc::new(InteractionService::new(database.clone(), config.clone(), notifier.clone()))
            as DynInteractionService;
        let admin = Arc::new(AdminService::new(database.clone(), config.clone(), notifier.clone())) as DynAdminService;

        info!("🧠 Services initialized");

        Self {
            account,
            ledger,
            catalog,
            interaction,
            admin,
            notifier,
            config,
            database,
        }
    }

    /// Swaps the messaging gateway in; every service shares the handle.
    pub async fn set_notifier(&self, notifier: DynNotifier) {
        self.notifier.set(notifier).await;
    }
}
