use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(nippo_web_migration::Migrator).await;
}
