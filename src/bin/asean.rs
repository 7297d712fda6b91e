use anyhow::{Result, bail};
use asean_indicators::api::DEFAULT_BASE_URL;
use asean_indicators::chart::{ChartConfig, MultiSeriesChart, SingleSeriesChart, format_value};
use asean_indicators::indicators::{self, ASEAN_COUNTRIES, INDICATORS, IndicatorSpec};
use asean_indicators::trend::{self, Abscissa};
use asean_indicators::{Client, IndicatorQuery, NormalizedRecord, proxy, stats, storage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::task::JoinSet;

#[derive(Parser, Debug)]
#[command(
    name = "asean",
    version,
    about = "Fetch, trend & export ASEAN economic indicators"
)]
struct Cli {
    /// Data360 `/data` endpoint.
    #[arg(long, global = true, env = "ASEAN_UPSTREAM_URL", default_value = DEFAULT_BASE_URL)]
    upstream_url: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one indicator for one country (and optionally trend, save, chart).
    Get(GetArgs),
    /// Fetch one indicator for several countries at once; prints a multi-series chart.
    Compare(CompareArgs),
    /// List the available indicators.
    Indicators,
    /// List the ASEAN reference areas.
    Countries,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First year (default: start of the series' history)
    #[arg(long)]
    from: Option<String>,
    /// Last year (default: current year)
    #[arg(long)]
    to: Option<String>,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Indicator slug (see `asean indicators`), e.g. gdp-per-capita
    indicator: String,
    /// ISO3 country code (default MYS)
    #[arg(short, long)]
    country: Option<String>,
    #[command(flatten)]
    range: RangeArgs,
    /// Unit filter forwarded upstream (unit-bearing indicators only)
    #[arg(long)]
    unit_measure: Option<String>,
    /// Print the least-squares trend next to each value.
    #[arg(long, default_value_t = false)]
    trend: bool,
    /// Print summary statistics.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Print the dashboard chart configuration (JSON) instead of a table.
    #[arg(long, default_value_t = false)]
    chart: bool,
    /// Line color for --chart, e.g. "rgb(16, 185, 129)" (default: dashboard blue).
    #[arg(long, requires = "chart")]
    color: Option<String>,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Indicator slug, e.g. inflation
    indicator: String,
    /// Country codes separated by comma or semicolon (default: all ASEAN members)
    #[arg(long)]
    countries: Option<String>,
    #[command(flatten)]
    range: RangeArgs,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_uppercase())
        .filter(|x| !x.is_empty())
        .collect()
}

fn lookup(slug: &str) -> Result<&'static IndicatorSpec> {
    match indicators::find(slug) {
        Some(spec) => Ok(spec),
        None => {
            let known: Vec<&str> = INDICATORS.iter().map(|i| i.slug).collect();
            bail!("unknown indicator `{slug}` (expected one of: {})", known.join(", "))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = Client::new(cli.upstream_url);
    match cli.cmd {
        Command::Get(args) => cmd_get(&client, args).await,
        Command::Compare(args) => cmd_compare(&client, args).await,
        Command::Indicators => {
            for i in INDICATORS {
                let units = if i.tracks_units { "  [units]" } else { "" };
                println!(
                    "{:<26}{} / {}  {}{}",
                    i.slug, i.database_id, i.indicator_code, i.name, units
                );
            }
            Ok(())
        }
        Command::Countries => {
            for c in ASEAN_COUNTRIES {
                println!("{}  {}", c.code, c.name);
            }
            Ok(())
        }
    }
}

async fn fetch(
    client: &Client,
    spec: &IndicatorSpec,
    query: &IndicatorQuery,
) -> Result<Vec<NormalizedRecord>> {
    match proxy::run(client, spec, query).await {
        Ok(records) => Ok(records),
        Err(e) => bail!(e.client_message()),
    }
}

async fn cmd_get(client: &Client, args: GetArgs) -> Result<()> {
    let spec = lookup(&args.indicator)?;
    let query = IndicatorQuery {
        country: args.country,
        from: args.range.from,
        to: args.range.to,
        unit_measure: args.unit_measure,
    };
    let records = fetch(client, spec, &query).await?;
    let country = query.resolve(spec).country;

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&records, path)?,
            "json" => storage::save_json(&records, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", records.len(), path.display());
    }

    let trend_line = if args.trend {
        trend::trend_line(&records)
    } else {
        None
    };

    if args.chart {
        let label = format!(
            "{} ({})",
            spec.name,
            indicators::country_name(&country).unwrap_or(country.as_str())
        );
        let mut chart = SingleSeriesChart::from_records(label, &records).with_trend(trend_line);
        if let Some(color) = args.color {
            chart = chart.with_color(color);
        }
        println!("{}", serde_json::to_string_pretty(&ChartConfig::Single(chart))?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No observations for {} in {}", spec.slug, country);
        return Ok(());
    }

    for (i, r) in records.iter().enumerate() {
        let unit = r.unit.as_deref().map(|u| format!("  {u}")).unwrap_or_default();
        match trend_line.as_ref().and_then(|t| t.get(i)) {
            Some(p) => println!(
                "{}\t{:>16}\t{:>16}{}",
                r.year,
                format_value(r.value),
                format_value(p.y),
                unit
            ),
            None => println!("{}\t{:>16}{}", r.year, format_value(r.value), unit),
        }
    }
    if args.trend {
        match trend::fit_series(&records) {
            Some((axis, fit)) => {
                let per = match axis {
                    Abscissa::Year => "per year",
                    Abscissa::Ordinal => "per observation",
                };
                println!("trend: {} {per}", format_value(fit.slope));
            }
            None => eprintln!("Not enough points for a trend line"),
        }
    }

    if args.stats
        && let Some(s) = stats::summary(&records)
    {
        println!(
            "{} • {}  count={}  {}..{}  min={} max={} mean={} median={}",
            country,
            spec.slug,
            s.count,
            s.first_year,
            s.last_year,
            format_value(s.min),
            format_value(s.max),
            format_value(s.mean),
            format_value(s.median)
        );
    }

    Ok(())
}

async fn cmd_compare(client: &Client, args: CompareArgs) -> Result<()> {
    let spec = lookup(&args.indicator)?;
    let countries = match &args.countries {
        Some(list) => parse_list(list),
        None => ASEAN_COUNTRIES.iter().map(|c| c.code.to_string()).collect(),
    };
    if countries.is_empty() {
        bail!("at least one country code required");
    }

    // Independent requests, no ordering between them; results are re-sorted below.
    let mut tasks = JoinSet::new();
    for (idx, country) in countries.iter().enumerate() {
        let client = client.clone();
        let query = IndicatorQuery {
            country: Some(country.clone()),
            from: args.range.from.clone(),
            to: args.range.to.clone(),
            unit_measure: None,
        };
        tasks.spawn(async move { (idx, proxy::run(&client, spec, &query).await) });
    }

    let mut results = Vec::with_capacity(countries.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(idx, _)| *idx);

    let mut series = Vec::new();
    for (idx, outcome) in results {
        let code = &countries[idx];
        match outcome {
            Ok(records) => {
                let label = indicators::country_name(code).unwrap_or(code.as_str()).to_string();
                series.push((label, records));
            }
            Err(e) => eprintln!("{code}: {}", e.client_message()),
        }
    }

    let chart = ChartConfig::Multi(MultiSeriesChart::from_series(series));
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}
