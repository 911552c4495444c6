#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Utc;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::truncate_token;
use crate::domain::models::DimensionsConfig;
use crate::domain::models::Language;
use crate::domain::models::Product;
use crate::domain::models::Token;
use crate::domain::services::seo::GenerateOptions;
use crate::domain::services::seo::SeoGenerator;
use crate::domain::services::CheckoutService;
use crate::domain::services::TokenStore;
use crate::infrastructure::api::ApiManager;
use crate::infrastructure::identity::IdentityManager;
use crate::infrastructure::storage::StorageManager;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Generate headlines, expand a story, or buy the selected pack.
- Left/Right arrow - Change the year (2030 to 2040).
- Up/Down arrow - Move the selection. CTRL+U and CTRL+D page through stories.
- g - Generate again.
- l - Cycle the interface language.
- p - Open pricing. On the pricing page, check for a completed payment.
- c - Copy your token on the payment page.
- Esc - Back to the home page.
- q or CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn format_token(token: &Token) -> String {
    let total = token
        .total_generations
        .map(|e| return format!("/{e}"))
        .unwrap_or_default();
    let mut res = format!(
        "- {} {}{total} remaining, expires {}",
        token.truncated(),
        token.remaining_generations,
        token.expires_at
    );

    if let Some(sku) = &token.product_sku {
        res = format!("{res}, {sku}");
    }
    if token.is_expired(Utc::now()) {
        res = format!("{res} (expired)");
    }

    return res;
}

pub fn format_product(product: &Product) -> String {
    let mut res = format!(
        "- {}: {} generations for {} ({} per generation)",
        product.sku,
        product.generations,
        product.price(),
        product.price_per_generation()
    );

    if product.popular {
        res = format!("{res}, most popular");
    }
    if let Some(discount) = product.discount_percent {
        res = format!("{res}, save {discount}%");
    }

    return res;
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!("Config file already exists at {config_file_path_str}"));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn generate_seo(matches: &ArgMatches) -> Result<()> {
    let config = DimensionsConfig::load(&Config::get(ConfigKey::DimensionsFile)).await?;
    let dry_run = matches.get_flag("dry-run");
    let opts = GenerateOptions::new(&Config::get(ConfigKey::OutputDir), dry_run);

    let report = SeoGenerator::new(config).generate(&opts).await?;
    println!("{}", Paint::green(report.to_string()));

    return Ok(());
}

async fn tokens_list() -> Result<()> {
    let store = TokenStore::load(StorageManager::get()).await?;
    if store.tokens().is_empty() {
        println!("There are no tokens on this device. Buy a pack with `futurehn` and press p on the pricing page.");
        return Ok(());
    }

    let lines = store
        .tokens()
        .iter()
        .map(format_token)
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));
    println!("\nTotal remaining: {}", store.get_total_generations());

    return Ok(());
}

async fn tokens_add(token: &str) -> Result<()> {
    let info = ApiManager::get().get_token_info(token).await?;
    let mut store = TokenStore::load(StorageManager::get()).await?;
    if store.add_token(info).await? {
        println!("{}", Paint::green(format!("Added token {}", truncate_token(token))));
    } else {
        println!("Token {} is already stored", truncate_token(token));
    }

    return Ok(());
}

async fn tokens_remove(token: &str) -> Result<()> {
    let mut store = TokenStore::load(StorageManager::get()).await?;
    if !store.remove_token(token).await? {
        bail!(format!("No token {} is stored", truncate_token(token)));
    }

    println!("Removed token {}", truncate_token(token));
    return Ok(());
}

async fn tokens_clear() -> Result<()> {
    let mut store = TokenStore::load(StorageManager::get()).await?;
    let count = store.tokens().len();
    store.clear().await?;

    println!("Removed {count} tokens");
    return Ok(());
}

async fn tokens_sync() -> Result<()> {
    let mut store = TokenStore::load(StorageManager::get()).await?;
    let report =
        CheckoutService::reconcile(&ApiManager::get(), &IdentityManager::get(), &mut store)
            .await?;

    if report.added.is_empty() {
        println!("No new tokens found for this device");
    } else {
        println!(
            "{}",
            Paint::green(format!("Added {} tokens", report.added.len()))
        );
    }
    if let Some(token) = report.display_token {
        println!("Your token: {}", truncate_token(&token));
    }

    return Ok(());
}

async fn print_trial() -> Result<()> {
    let device_id = IdentityManager::get().get_id().await?;
    let trial = ApiManager::get().get_trial_status(&device_id).await?;

    println!("Device: {device_id}");
    if trial.has_free_trial {
        println!("Free trial available ({} uses remaining)", trial.uses_remaining);
    } else {
        println!("Free trial used");
    }

    return Ok(());
}

async fn print_products(remote: bool) -> Result<()> {
    let products = if remote {
        ApiManager::get().list_products().await?
    } else {
        Product::catalog()
    };

    let lines = products
        .iter()
        .map(format_product)
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));

    return Ok(());
}

async fn doctor() -> Result<()> {
    let api_url = Config::get(ConfigKey::ApiURL);
    match ApiManager::get().health_check().await {
        Ok(()) => println!("{} API reachable at {api_url}", Paint::green("✓")),
        Err(err) => println!("{} API unreachable at {api_url}: {err}", Paint::red("✗")),
    }

    match IdentityManager::get().get_id().await {
        Ok(id) => println!("{} Device id {id}", Paint::green("✓")),
        Err(err) => println!("{} No device id: {err}", Paint::red("✗")),
    }

    let store = TokenStore::load(StorageManager::get()).await?;
    println!(
        "{} {} tokens in {}",
        Paint::green("✓"),
        store.tokens().len(),
        Config::get(ConfigKey::TokenFile)
    );

    let log_path = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("futurehn/debug.log");
    println!("  Debug log: {}", log_path.to_string_lossy());

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_seo() -> Command {
    return Command::new("seo")
        .about("Static SEO page generation.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Renders one HTML page per dimension combination plus sitemaps. The page directory is wiped first.")
                .arg(
                    Arg::new(ConfigKey::DimensionsFile.to_string())
                        .short('d')
                        .long(ConfigKey::DimensionsFile.to_string())
                        .env("FUTUREHN_DIMENSIONS_FILE")
                        .num_args(1)
                        .help("Path to a dimensions.json file. Uses the bundled Future Hacker News dimensions when unset."),
                )
                .arg(
                    Arg::new(ConfigKey::OutputDir.to_string())
                        .short('o')
                        .long(ConfigKey::OutputDir.to_string())
                        .env("FUTUREHN_OUTPUT_DIR")
                        .num_args(1)
                        .help(format!("Directory to write pages and sitemaps to. [default: {}]", Config::default(ConfigKey::OutputDir))),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Count pages without writing anything.")
                        .action(ArgAction::SetTrue),
                ),
        );
}

fn arg_token() -> Arg {
    return Arg::new("token")
        .help("Full token string")
        .required(true)
        .num_args(1);
}

fn subcommand_tokens() -> Command {
    return Command::new("tokens")
        .about("Manage the credit tokens stored on this device.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List stored tokens and their remaining generations."))
        .subcommand(
            Command::new("add")
                .about("Look up a token from a purchase and store it on this device.")
                .arg(arg_token()),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a stored token.")
                .arg(arg_token()),
        )
        .subcommand(Command::new("clear").about("Remove every stored token."))
        .subcommand(Command::new("sync").about("Fetch every token bought with this device and store the missing ones."));
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("BROWSE {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("futurehn")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("browse").about("Browse the front page of the future. This is the default command."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("doctor").about("Checks the API, device identity and token file."))
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .subcommand(
            Command::new("products")
                .about("List credit packs.")
                .arg(
                    Arg::new("remote")
                        .long("remote")
                        .help("Fetch the list from the API instead of the built in catalog.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(subcommand_seo())
        .subcommand(subcommand_tokens())
        .subcommand(Command::new("trial").about("Shows whether this device still has a free generation."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("FUTUREHN_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("FUTUREHN_API_URL")
                .num_args(1)
                .help(format!("Future Hacker News API URL. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SiteURL.to_string())
                .long(ConfigKey::SiteURL.to_string())
                .env("FUTUREHN_SITE_URL")
                .num_args(1)
                .help(format!("Site URL that checkout redirects back to. [default: {}]", Config::default(ConfigKey::SiteURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Lang.to_string())
                .short('l')
                .long(ConfigKey::Lang.to_string())
                .env("FUTUREHN_LANG")
                .num_args(1)
                .help("Interface and headline language. Defaults to the language of $LANG.")
                .value_parser(PossibleValuesParser::new(Language::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Year.to_string())
                .short('y')
                .long(ConfigKey::Year.to_string())
                .env("FUTUREHN_YEAR")
                .num_args(1)
                .help(format!("Initial year to generate headlines for, between 2030 and 2040. [default: {}]", Config::default(ConfigKey::Year)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DeviceID.to_string())
                .long(ConfigKey::DeviceID.to_string())
                .env("FUTUREHN_DEVICE_ID")
                .num_args(1)
                .help("Use a fixed device id instead of deriving one from this machine.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::TokenFile.to_string())
                .long(ConfigKey::TokenFile.to_string())
                .env("FUTUREHN_TOKEN_FILE")
                .num_args(1)
                .help(format!("Where purchased tokens are stored. [default: {}]", Config::default(ConfigKey::TokenFile)))
                .global(true),
        );
}

/// Runs non interactive subcommands. Returns true when the UI should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("browse", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("doctor", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            doctor().await?;
            return Ok(false);
        }
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        Some(("products", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_products(subcmd_matches.get_flag("remote")).await?;
            return Ok(false);
        }
        Some(("seo", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("generate", generate_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, generate_matches]).await?;
                generate_seo(generate_matches).await?;
                return Ok(false);
            }
            _ => {
                subcommand_seo().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("tokens", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("list", _)) => tokens_list().await?,
                Some(("add", add_matches)) => {
                    if let Some(token) = add_matches.get_one::<String>("token") {
                        tokens_add(token).await?;
                    }
                }
                Some(("remove", remove_matches)) => {
                    if let Some(token) = remove_matches.get_one::<String>("token") {
                        tokens_remove(token).await?;
                    }
                }
                Some(("clear", _)) => tokens_clear().await?,
                Some(("sync", _)) => tokens_sync().await?,
                _ => subcommand_tokens().print_long_help()?,
            }
            return Ok(false);
        }
        Some(("trial", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_trial().await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
