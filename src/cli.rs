// src/cli.rs
use std::{io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::{
    config::{
        options::{GroupMode, MarketOptions, SortKey, ViewOptions},
        query::{self, UrlSettings},
    },
    core::{Fetch, ProxyClient},
    export,
    items::Rarity,
    market::Side,
    progress::Progress,
    scrape,
    specs::{self, players::PlayerSummary},
    viewer::InventoryViewer,
};

#[derive(Debug, Parser)]
#[command(name = "stash_scrape", version, about = "Inventory and market browser (CLI)")]
pub struct Cli {
    /// Proxy base URL (defaults to $STASH_SCRAPE_PROXY, then the built-in one)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find players by name fragment
    Search { fragment: String },
    /// Aggregate inventories for one or more players into CSV
    Inventory(InventoryArgs),
    /// List market items
    Market(MarketArgs),
    /// A player's market orders, flagged where they're the cheapest seller
    Orders { player: String },
    /// Print the query string for the given players and view options
    Settings {
        #[arg(long = "player", short = 'p')]
        players: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Player id (repeatable)
    #[arg(long = "player", short = 'p')]
    pub players: Vec<String>,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Join id-only pockets against the item catalog
    #[arg(long)]
    pub catalog: bool,

    /// Write CSV here instead of stdout
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Start from a saved query string (`players=…&group=player…`)
    #[arg(long)]
    pub settings: Option<String>,

    #[arg(long)]
    pub group_by_player: bool,

    /// Show packages as-is instead of their contents
    #[arg(long)]
    pub no_packages: bool,

    #[arg(long, allow_negative_numbers = true, value_parser = clap::value_parser!(i8).range(-1..=8))]
    pub tier: Option<i8>,

    #[arg(long)]
    pub rarity: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// name | tier | rarity | count
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortKey>,

    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct MarketArgs {
    /// Only items with buy orders
    #[arg(long)]
    pub buy: bool,

    /// Don't require sell orders
    #[arg(long)]
    pub any_sell: bool,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Also fetch lowest ask / highest bid for the listed items
    #[arg(long)]
    pub prices: bool,
}

fn parse_sort(s: &str) -> std::result::Result<SortKey, String> {
    SortKey::parse(s).ok_or_else(|| format!("unknown sort key {s:?} (name, tier, rarity, count)"))
}

impl ViewArgs {
    /// Query-string base (if any) with explicit flags layered on top.
    fn resolve(&self, players: &[String]) -> UrlSettings {
        let mut s = self.settings.as_deref().map(query::decode).unwrap_or_default();
        if !players.is_empty() {
            s.player_ids = players.to_vec();
        }
        let v: &mut ViewOptions = &mut s.view;
        if self.group_by_player {
            v.group = GroupMode::ItemAndPlayer;
        }
        if self.no_packages {
            v.expand_packages = false;
        }
        if let Some(t) = self.tier {
            v.filters.tier = Some(t);
        }
        if let Some(r) = &self.rarity {
            v.filters.rarity = Some(Rarity::parse(r));
        }
        if let Some(t) = &self.tag {
            v.filters.tag = Some(t.clone());
        }
        if let Some(q) = &self.search {
            v.filters.search = q.clone();
        }
        if let Some(k) = self.sort {
            v.sort.key = k;
        }
        if self.desc {
            v.sort.descending = true;
        }
        s
    }
}

/// Prints failures to stderr as they happen.
struct StderrProgress;

impl Progress for StderrProgress {
    fn item_failed(&mut self, id: &str, msg: &str) {
        eprintln!("warning: {id}: {msg}");
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = match &cli.proxy {
        Some(base) => ProxyClient::new(base),
        None => ProxyClient::from_env(),
    }
    .wrap_err("proxy setup")?;
    logf!("CLI: {:?} via {}", cli.cmd, client.base());

    match cli.cmd {
        Command::Search { fragment } => search(&client, &fragment),
        Command::Inventory(args) => inventory(&client, &args),
        Command::Market(args) => market(&client, &args),
        Command::Orders { player } => orders(&client, &player),
        Command::Settings { players, view } => {
            println!("{}", query::encode(&view.resolve(&players)));
            Ok(())
        }
    }
}

fn search(fetch: &dyn Fetch, fragment: &str) -> Result<()> {
    for p in specs::players::search(fetch, fragment)? {
        println!("{},{}", p.id, p.name);
    }
    Ok(())
}

/// Profile lookup for display names; an id that can't be resolved keeps the id as name.
fn resolve_player(fetch: &dyn Fetch, id: &str) -> PlayerSummary {
    match specs::players::profile(fetch, id) {
        Ok(Some(p)) => p,
        Ok(None) => PlayerSummary { id: s!(id), name: s!(id) },
        Err(e) => {
            logw!("Profile {id}: {e}");
            PlayerSummary { id: s!(id), name: s!(id) }
        }
    }
}

fn inventory(fetch: &dyn Fetch, args: &InventoryArgs) -> Result<()> {
    let settings = args.view.resolve(&args.players);
    if settings.player_ids.is_empty() {
        return Err(eyre!("no players given (use --player or --settings players=…)"));
    }

    let catalog = if args.catalog { Some(specs::catalog::fetch(fetch)?) } else { None };

    let mut viewer = InventoryViewer::new();
    for id in &settings.player_ids {
        viewer.add_player(resolve_player(fetch, id));
    }
    viewer.refresh(fetch, catalog.as_ref(), Some(&mut StderrProgress));

    let rows = viewer.view(&settings.view);
    let group = settings.view.group;
    match &args.out {
        Some(path) => {
            let written = export::export_to_path(path, &rows, group, !args.no_headers)
                .wrap_err_with(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} rows to {}", rows.len(), written.display());
        }
        None => {
            let text = export::to_export_string(&rows, group, !args.no_headers);
            std::io::stdout().write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

fn market(fetch: &dyn Fetch, args: &MarketArgs) -> Result<()> {
    let opts = MarketOptions { has_sell_orders: !args.any_sell, has_buy_orders: args.buy };
    let view = args.view.resolve(&[]).view;

    let mut board = crate::market::MarketBoard::new();
    let ticket = board.begin_load();
    board.apply_listings(ticket, specs::market::listing(fetch, &opts)?);

    if args.prices {
        let ids = board.missing_prices(board.view(&view.filters, view.sort));
        scrape::order_book_waves(fetch, &ids, Some(&mut StderrProgress), |wave| {
            board.apply_prices(ticket, scrape::wave_prices(wave));
        });
    }

    let fmt = |p: Option<u64>| p.map(|v| v.to_string()).unwrap_or_default();
    println!("Id,Name,Tier,Rarity,Tag,Sell,Buy,LowestSell,HighestBuy");
    for l in board.view(&view.filters, view.sort) {
        let price = board.price(&l.id).copied().unwrap_or_default();
        println!(
            "{},\"{}\",{},{},{},{},{},{},{}",
            l.id,
            l.name.replace('"', "\"\""),
            l.tier,
            l.rarity,
            l.tag,
            l.sell_orders,
            l.buy_orders,
            fmt(price.lowest_sell),
            fmt(price.highest_buy),
        );
    }
    Ok(())
}

fn orders(fetch: &dyn Fetch, player: &str) -> Result<()> {
    let flagged = scrape::cheapest_orders(fetch, player, Some(&mut StderrProgress))?;
    println!("Side,Item,Price,Quantity,Location,Cheapest");
    for f in flagged {
        let o = &f.order;
        let cheapest = match (o.side, f.cheapest) {
            (Side::Buy, _) => "",
            (Side::Sell, Some(true)) => "yes",
            (Side::Sell, Some(false)) => "no",
            (Side::Sell, None) => "?",
        };
        println!(
            "{},\"{}\",{},{},{},{}",
            o.side.as_str(),
            o.item_name.replace('"', "\"\""),
            o.price,
            o.quantity,
            o.location,
            cheapest
        );
    }
    Ok(())
}
