////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的数据库底层操作
//
//////////////////////////////////////////////////////////////////////

use mongodb::{error::UNKNOWN_TRANSACTION_COMMIT_RESULT, Client, ClientSession, Collection, IndexModel};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use std::sync::Arc;
use tracing::{error, info};
use utils::{AppConfig, AppResult};

pub mod account;
pub mod admin_action;
pub mod interaction;
pub mod ledger;
pub mod status;
pub mod support_item;

pub use account::model::Account;
pub use admin_action::model::{AdminAction, AdminPayload};
pub use interaction::model::Interaction;
pub use ledger::model::LedgerEntry;
pub use status::{ActingParty, ApprovalStatus, ResolveOutcome};
pub use support_item::model::{SupportItem, SupportKind};

#[derive(Clone, Debug)]
pub struct Database {
    pub client: Client,
    pub accounts: Collection<Account>,
    pub ledger_entries: Collection<LedgerEntry>,
    pub support_items: Collection<SupportItem>,
    pub interactions: Collection<Interaction>,
    pub admin_actions: Collection<AdminAction>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let accounts = db.collection("Account");
        let ledger_entries = db.collection("LedgerEntry");
        let support_items = db.collection("SupportItem");
        let interactions = db.collection("Interaction");
        let admin_actions = db.collection("AdminAction");

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        Ok(Database {
            client,
            accounts,
            ledger_entries,
            support_items,
            interactions,
            admin_actions,
        })
    }

    /// 开启一个已启动事务的会话。Every cross-document invariant (balance +
    /// ledger entry, transition + credit) lives inside one of these sessions.
    pub async fn start_transaction(&self) -> AppResult<ClientSession> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;
        Ok(session)
    }

    /// Commit with retry on transient driver errors.
    pub async fn commit_transaction(&self, session: &mut ClientSession) -> AppResult<()> {
        loop {
            match session.commit_transaction().await {
                Ok(()) => return Ok(()),
                Err(e) if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) => {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// 初始化集合索引。Uniqueness constraints (duplicate claim, telegram_id,
    /// referral_token, alias) are enforced here, not by application checks.
    pub async fn init_indexes(&self) -> AppResult<()> {
        info!("🔧 初始化集合索引...");

        let account_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "telegram_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("telegram_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "alias": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .sparse(true)
                        .name("alias_unique_sparse".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "referral_token": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("referral_token_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        let ledger_indexes = vec![IndexModel::builder()
            .keys(doc! { "telegram_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("ledger_account_recent".to_string()).build())
            .build()];

        let support_item_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "kind": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("item_kind_recent".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "owner_id": 1 })
                .options(IndexOptions::builder().name("item_owner".to_string()).build())
                .build(),
        ];

        let interaction_indexes = vec![
            // (kind, item, actor) is unique: closes the race between two
            // concurrent claims on the same item.
            IndexModel::builder()
                .keys(doc! { "kind": 1, "item_id": 1, "actor_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uniq_kind_item_actor".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "expires_at": 1 })
                .options(IndexOptions::builder().name("interaction_expiry_sweep".to_string()).build())
                .build(),
        ];

        let admin_action_indexes = vec![IndexModel::builder()
            .keys(doc! { "status": 1, "expires_at": 1 })
            .options(IndexOptions::builder().name("action_expiry_sweep".to_string()).build())
            .build()];

        let results = vec![
            ("Account", self.accounts.create_indexes(account_indexes, None).await),
            ("LedgerEntry", self.ledger_entries.create_indexes(ledger_indexes, None).await),
            ("SupportItem", self.support_items.create_indexes(support_item_indexes, None).await),
            ("Interaction", self.interactions.create_indexes(interaction_indexes, None).await),
            ("AdminAction", self.admin_actions.create_indexes(admin_action_indexes, None).await),
        ];

        for (collection, result) in results {
            match result {
                Ok(created) => info!("✅ {} 索引创建成功: {:?}", collection, created.index_names),
                Err(e) => {
                    error!("❌ {} 索引创建失败: {}", collection, e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}
