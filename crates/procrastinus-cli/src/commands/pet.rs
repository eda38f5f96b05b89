use clap::Subcommand;
use procrastinus_core::services::StoreGroupLog;
use procrastinus_core::{PetService, PetState};
use serde::Serialize;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum PetAction {
    /// Show the pet after catching up on hunger decay
    Status,
    /// Feed an item from the inventory
    Feed {
        /// Item id (e.g. "rice")
        item: String,
    },
    /// Give the pet a new name
    Rename {
        name: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PetView<'a> {
    #[serde(flatten)]
    pet: &'a PetState,
    level: u64,
    xp: u64,
    xp_to_next: u64,
}

pub fn run(account: &str, action: PetAction) -> CliResult {
    let ctx = Context::open(account)?;
    let sink = StoreGroupLog::new(&ctx.store);
    let pets = PetService::new(&ctx.store, &ctx.config).with_group_log(&sink);

    let pet = match action {
        PetAction::Status => pets.load(&ctx.user, ctx.now)?,
        PetAction::Feed { item } => pets.feed(&ctx.user, &item, ctx.now)?,
        PetAction::Rename { name } => pets.rename(&ctx.user, &name, ctx.now)?,
    };

    print_json(&PetView {
        pet: &pet,
        level: pet.level(),
        xp: pet.xp(),
        xp_to_next: pet.xp_to_next(),
    })
}
