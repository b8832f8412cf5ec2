use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "undangan", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a site JSON file.
    Validate(ValidateArgs),
    /// Print the resolved invitation content as JSON.
    Content(ContentArgs),
    /// Run one section on a virtual clock and print its reveal timeline as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input site JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ContentArgs {
    /// Input site JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Invitation link query string, e.g. "nama=Budi&nama=Sari".
    #[arg(long, default_value = "")]
    query: String,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input site JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Section to compose.
    #[arg(long, value_enum)]
    scene: SceneChoice,

    /// Invitation link query string, e.g. "nama=Budi".
    #[arg(long, default_value = "")]
    query: String,

    /// Virtual time at which every observed element scrolls into view.
    #[arg(long, default_value_t = 0)]
    visible_at: u64,

    /// Virtual time at which the simulation stops.
    #[arg(long, default_value_t = 5000)]
    until: u64,

    /// Log every reveal transition to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneChoice {
    Hero,
    Couple,
    Event,
}

#[derive(Debug, serde::Serialize)]
struct ContentReport {
    guest: String,
    greeting: String,
    title: &'static str,
    headline: String,
    reception: undangan::ReceptionCard,
    gift: undangan::GiftCard,
}

#[derive(Debug, serde::Serialize)]
struct Timeline<'a> {
    scene: &'a undangan::Scene,
    #[serde(skip_serializing_if = "Option::is_none")]
    reception: Option<&'a undangan::ReceptionCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gift: Option<&'a undangan::GiftCard>,
    events: &'a [undangan::RevealEvent],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Content(args) => cmd_content(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_site_json(path: &Path) -> anyhow::Result<undangan::SiteData> {
    let f = File::open(path).with_context(|| format!("open site '{}'", path.display()))?;
    let r = BufReader::new(f);
    let site: undangan::SiteData =
        serde_json::from_reader(r).with_context(|| "parse site JSON")?;
    site.validate()?;
    Ok(site)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    read_site_json(&args.in_path)?;
    eprintln!("ok {}", args.in_path.display());
    Ok(())
}

fn cmd_content(args: ContentArgs) -> anyhow::Result<()> {
    let site = read_site_json(&args.in_path)?;
    let guest = undangan::GuestName::from_query(&args.query);
    let report = ContentReport {
        guest: guest.to_string(),
        greeting: guest.greeting(),
        title: undangan::HERO_TITLE,
        headline: site.wedding.couple.headline(),
        reception: undangan::ReceptionCard::new(&site.wedding.reception),
        gift: undangan::GiftCard::new(&site.wedding.digital_envelope),
    };
    print_json(&report)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }
    if args.until < args.visible_at {
        anyhow::bail!(
            "--until ({}) must not be before --visible-at ({})",
            args.until,
            args.visible_at
        );
    }

    let site = read_site_json(&args.in_path)?;
    let guest = undangan::GuestName::from_query(&args.query);
    let mut tree =
        undangan::RevealTree::with_policy(undangan::ManualTimers::new(), site.motion.policy);
    let mut composer = undangan::SceneComposer::new(&site.motion);

    let (scene, cards) = match args.scene {
        SceneChoice::Hero => (composer.hero(&mut tree, &site, &guest)?, None),
        SceneChoice::Couple => (composer.couple(&mut tree, &site.wedding.couple)?, None),
        SceneChoice::Event => {
            let event = composer.event(&mut tree, &site)?;
            (event.scene, Some((event.reception, event.gift)))
        }
    };
    for diagnostic in &scene.diagnostics {
        eprintln!("skipped {}: {}", diagnostic.element, diagnostic.message);
    }

    tree.advance_to(args.visible_at);
    for &node in &scene.observed {
        tree.report_visibility(node, true);
    }
    tree.advance_to(args.until);

    let timeline = Timeline {
        scene: &scene,
        reception: cards.as_ref().map(|(reception, _)| reception),
        gift: cards.as_ref().map(|(_, gift)| gift),
        events: tree.events(),
    };
    print_json(&timeline)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).with_context(|| "serialize output JSON")?;
    println!("{json}");
    Ok(())
}
