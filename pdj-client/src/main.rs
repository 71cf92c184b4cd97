// pdj-client/src/main.rs
use clap::Parser;
use pdj_common::{EditPage, FileStorage, LocalProductStore};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod disk_image;
mod terminal;

use disk_image::DiskImage;
use terminal::{ConsoleMessages, TerminalNavigator, TerminalView};

/// Edit one stored product from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Page URL carrying the product id, e.g. "Editar.html?id=3"
    #[arg(short, long)]
    page: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    desc: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    /// Replace the product image with this file
    #[arg(short, long)]
    image: Option<PathBuf>,
    /// Leave for the listing without saving
    #[arg(long, conflicts_with = "goto_create")]
    cancel: bool,
    /// Leave for the creation page without saving
    #[arg(long)]
    goto_create: bool,
}

type BoxedError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    let cli = Cli::parse();
    let config = config::load_config()?;
    init_tracing(&config.log_level);
    info!("Using storage file {}", config.storage_path().display());

    let store = Arc::new(LocalProductStore::new(FileStorage::new(config.storage_path())));
    let view = Arc::new(TerminalView::new());
    let navigator = Arc::new(TerminalNavigator::default());
    let page = EditPage::new(store, view.clone(), Arc::new(ConsoleMessages), navigator.clone());

    let outcome = run_page(&cli, &page, &view).await;
    // Navigation requested before a failure still happens.
    navigator.settle().await;
    outcome
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_page(cli: &Cli, page: &EditPage, view: &TerminalView) -> Result<(), BoxedError> {
    // Page errors are already shown to the user and routed by the page itself.
    if let Err(e) = page.open(&cli.page) {
        debug!("Page load ended: {}", e);
        return Ok(());
    }
    view.print_form();

    if cli.cancel {
        page.cancel();
        return Ok(());
    }
    if cli.goto_create {
        page.go_to_create();
        return Ok(());
    }

    view.type_into(|fields| {
        if let Some(name) = &cli.name {
            fields.name = name.clone();
        }
        if let Some(desc) = &cli.desc {
            fields.desc = desc.clone();
        }
        if let Some(price) = &cli.price {
            fields.price = price.clone();
        }
        if let Some(stock) = &cli.stock {
            fields.stock = stock.clone();
        }
    });

    if let Some(path) = &cli.image {
        let file = DiskImage::open(path)
            .await
            .map_err(|e| format!("Cannot open image {}: {}", path.display(), e))?;
        view.choose(Arc::new(file));
        if let Err(e) = page.select_image().await {
            debug!("Image rejected: {}", e);
            return Ok(());
        }
    }

    if let Err(e) = page.submit().await {
        debug!("Submit ended: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cancel_and_goto_create_conflict() {
        let result = Cli::try_parse_from(["pdj-client", "--page", "Editar.html?id=1", "--cancel", "--goto-create"]);
        assert!(result.is_err());
    }

    #[test]
    fn field_overrides_parse() {
        let cli = Cli::try_parse_from([
            "pdj-client",
            "-p",
            "Editar.html?id=1",
            "--name",
            "Mate",
            "--price",
            "12.5",
            "--image",
            "cup.png",
        ])
        .unwrap();
        assert_eq!(cli.page, "Editar.html?id=1");
        assert_eq!(cli.name.as_deref(), Some("Mate"));
        assert_eq!(cli.price.as_deref(), Some("12.5"));
        assert_eq!(cli.stock, None);
        assert_eq!(cli.image, Some(PathBuf::from("cup.png")));
    }
}
