//! Command-line view of the skill catalog.
//!
//! Runs one query against the catalog and prints the result as JSON (or the
//! sitemap as XML). The catalog comes from `--catalog`, `SKILLHUB_CATALOG`, or
//! the copy embedded in the binary, in that order.

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::{Value, json};
use skillhub::catalog::registry;
use skillhub::messages::messages;
use skillhub::routes::{Route, resolve_request};
use skillhub::sitemap::{build_sitemap, render_sitemap_xml};
use skillhub::views::{PageBody, ViewContext, render_page};
use skillhub::{CatalogIndex, Locale, Messages, PageRequest, SiteConfig, Skill};
use std::env;
use std::ffi::OsString;
use std::iter::Peekable;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_POPULAR: usize = 8;
const DEFAULT_RECENT: usize = 4;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse(env::args_os().skip(1))?;
    let mut config = SiteConfig::from_env()?;
    if let Some(path) = cli.catalog.clone() {
        config.catalog_path = Some(path);
    }
    let locale = cli.locale.unwrap_or(config.default_locale);

    let catalog = registry::install_from(config.catalog_path.as_deref())?;
    let messages = messages()?;
    messages.ensure_category_labels(catalog.categories())?;

    match &cli.command {
        Command::Sitemap => {
            let entries = build_sitemap(catalog, &config, chrono::Utc::now());
            print!("{}", render_sitemap_xml(&entries));
        }
        command => {
            let output = execute(command, catalog, messages, &config, locale)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("failed to render output")?
            );
        }
    }
    Ok(())
}

fn execute(
    command: &Command,
    catalog: &CatalogIndex,
    messages: &Messages,
    config: &SiteConfig,
    locale: Locale,
) -> Result<Value> {
    let routing = config.routing();
    let listing = |skills: Vec<&Skill>| -> Result<Value> {
        let cards: Vec<SkillLine> = skills
            .into_iter()
            .map(|skill| SkillLine {
                slug: skill.slug.as_str(),
                name: &skill.name,
                category: messages.category_label(locale, skill.category.as_str()),
                install_count: skill.install_count,
                rating: skill.rating,
                featured: skill.featured,
                href: Route::Skill {
                    slug: skill.slug.0.clone(),
                }
                .href(&routing, locale),
            })
            .collect();
        Ok(serde_json::to_value(cards)?)
    };

    match command {
        Command::Search(query) => listing(catalog.search_skills(query)),
        Command::Category(slug) => {
            if catalog.category_by_slug(slug).is_none() {
                bail!("no category with slug '{slug}'");
            }
            listing(catalog.skills_by_category(slug))
        }
        Command::Featured => listing(catalog.featured_skills()),
        Command::Popular(limit) => listing(catalog.popular_skills(*limit)),
        Command::Recent(limit) => listing(catalog.recent_skills(*limit)),
        Command::Categories => Ok(Value::Array(
            catalog
                .categories_with_counts()
                .into_iter()
                .map(|entry| {
                    json!({
                        "slug": entry.category.slug,
                        "icon": entry.category.icon,
                        "label": messages.category_label(locale, entry.category.slug.as_str()),
                        "count": entry.count,
                    })
                })
                .collect(),
        )),
        Command::Show(slug) => {
            let request = PageRequest {
                locale,
                route: Route::Skill { slug: slug.clone() },
            };
            let ctx = ViewContext {
                catalog,
                messages,
                routing: &routing,
            };
            match render_page(ctx, &request).body {
                PageBody::Skill(detail) => Ok(serde_json::to_value(detail)?),
                _ => bail!("no skill with slug '{slug}'"),
            }
        }
        Command::Resolve(target) => {
            let (path, query) = match target.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (target.as_str(), None),
            };
            let request = resolve_request(&routing, path, query);
            let alternates: Vec<Value> = routing
                .alternates(&request.route.path())
                .into_iter()
                .map(|(locale, href)| json!({ "locale": locale, "href": href }))
                .collect();
            Ok(json!({
                "locale": request.locale,
                "route": request.route,
                "alternates": alternates,
            }))
        }
        Command::Sitemap => bail!("--sitemap renders XML, not JSON"),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillLine<'a> {
    slug: &'a str,
    name: &'a str,
    category: String,
    install_count: u64,
    rating: f64,
    featured: bool,
    href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Search(String),
    Category(String),
    Show(String),
    Featured,
    Popular(usize),
    Recent(usize),
    Categories,
    Sitemap,
    Resolve(String),
}

#[derive(Debug, PartialEq, Eq)]
struct Cli {
    command: Command,
    locale: Option<Locale>,
    catalog: Option<PathBuf>,
}

impl Cli {
    fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter().peekable();
        let mut command: Option<Command> = None;
        let mut locale: Option<Locale> = None;
        let mut catalog: Option<PathBuf> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            let parsed = match arg.as_str() {
                "--search" => Command::Search(next_value(&mut args, "--search")?),
                "--category" => Command::Category(next_value(&mut args, "--category")?),
                "--show" => Command::Show(next_value(&mut args, "--show")?),
                "--featured" => Command::Featured,
                "--popular" => Command::Popular(
                    optional_count(&mut args, "--popular")?.unwrap_or(DEFAULT_POPULAR),
                ),
                "--recent" => Command::Recent(
                    optional_count(&mut args, "--recent")?.unwrap_or(DEFAULT_RECENT),
                ),
                "--categories" => Command::Categories,
                "--sitemap" => Command::Sitemap,
                "--resolve" => Command::Resolve(next_value(&mut args, "--resolve")?),
                "--locale" => {
                    let raw = next_value(&mut args, "--locale")?;
                    locale = Some(
                        Locale::parse(&raw)
                            .ok_or_else(|| anyhow!("unsupported locale '{raw}' (expected en|zh)"))?,
                    );
                    continue;
                }
                "--catalog" => {
                    catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?));
                    continue;
                }
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            };
            if command.is_some() {
                bail!("only one command may be given\n{}", usage());
            }
            command = Some(parsed);
        }

        let command = command.ok_or_else(|| anyhow!("missing command\n{}", usage()))?;
        Ok(Cli {
            command,
            locale,
            catalog,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

/// Consume the next argument as a count unless it is another flag.
fn optional_count<I>(args: &mut Peekable<I>, flag: &str) -> Result<Option<usize>>
where
    I: Iterator<Item = OsString>,
{
    let is_value = args
        .peek()
        .and_then(|next| next.to_str())
        .is_some_and(|next| !next.starts_with("--"));
    if !is_value {
        return Ok(None);
    }
    let raw = next_value(args, flag)?;
    let count = raw
        .parse()
        .with_context(|| format!("{flag} expects a number, got '{raw}'"))?;
    Ok(Some(count))
}

fn usage() -> &'static str {
    "Usage: skillhub [--locale en|zh] [--catalog PATH] <command>\n\
Commands:\n\
  --search QUERY       skills whose name, description or tags contain QUERY\n\
  --category SLUG      skills in one category\n\
  --show SLUG          full detail view of one skill\n\
  --featured           featured skills\n\
  --popular [N]        top N skills by installs (default 8)\n\
  --recent [N]         N most recently updated skills (default 4)\n\
  --categories         categories with skill counts\n\
  --sitemap            sitemap XML for every locale\n\
  --resolve PATH       locale and page a request path resolves to\n"
}
