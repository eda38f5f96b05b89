use clap::Subcommand;
use procrastinus_core::services::StoreGroupLog;
use procrastinus_core::ShopService;
use serde_json::json;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List the food catalog
    List,
    /// Buy one item
    Buy {
        /// Item id (e.g. "bubble_tea")
        item: String,
    },
    /// Show wallet and inventory
    Inventory,
}

pub fn run(account: &str, action: ShopAction) -> CliResult {
    let ctx = Context::open(account)?;
    let sink = StoreGroupLog::new(&ctx.store);
    let shop = ShopService::new(&ctx.store).with_group_log(&sink);

    match action {
        ShopAction::List => print_json(shop.catalog()),
        ShopAction::Buy { item } => {
            let (item, wallet) = shop.purchase(&ctx.user, &item, ctx.now)?;
            print_json(&json!({ "item": item, "coins": wallet.coins }))
        }
        ShopAction::Inventory => {
            let wallet = shop.wallet(&ctx.user)?;
            let inventory = shop.inventory(&ctx.user)?;
            print_json(&json!({ "coins": wallet.coins, "items": inventory.items }))
        }
    }
}
