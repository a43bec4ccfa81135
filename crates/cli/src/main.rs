use stockroom_cli::{CliConfig, Menu};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::from_env();
    stockroom_observability::init(config.log_format);

    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(output = ?config.output, "starting inventory menu");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), config.output);
    menu.run()?;

    let inventory = menu.inventory();
    tracing::info!(
        products = inventory.catalog.len(),
        suppliers = inventory.suppliers.len(),
        orders = inventory.ledger.len(),
        "inventory menu closed"
    );
    Ok(())
}
