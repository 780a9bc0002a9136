use clap::{Parser, Subcommand};
use paircorr::engine::compute;
use paircorr::models::{
    Interpretation, PairAnalysis, Period, StrengthThresholds, SummaryStats, TickerHistory,
};
use paircorr::provider::YahooClient;

#[derive(Parser)]
#[command(name = "paircorr")]
#[command(about = "Correlation analysis of two stock tickers from daily closing prices")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch both tickers and print the full pair analysis
    Analyze {
        /// First ticker symbol (e.g. 7203.T)
        ticker_a: String,
        /// Second ticker symbol (e.g. 6758.T)
        ticker_b: String,
        /// Lookback period: 1mo, 3mo, 6mo, 1y, 2y, 5y, max
        #[arg(short, long, default_value = "1y")]
        period: Period,
        /// Rolling correlation window in return rows
        #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(20..=120))]
        window_days: u32,
        /// Emit the analysis as JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Fetch one ticker's price history and print it
    History {
        /// Ticker symbol
        ticker: String,
        /// Lookback period: 1mo, 3mo, 6mo, 1y, 2y, 5y, max
        #[arg(short, long, default_value = "1y")]
        period: Period,
        /// Emit the history as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut client = YahooClient::new(true, 30)?;

    match cli.command {
        Commands::Analyze {
            ticker_a,
            ticker_b,
            period,
            window_days,
            json,
        } => {
            let history_a = client.fetch_history(&ticker_a, period).await?;
            let history_b = client.fetch_history(&ticker_b, period).await?;
            let analysis = compute(&history_a.series, &history_b.series, window_days as usize)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&history_a, &history_b, &analysis, period, window_days);
            }
        }
        Commands::History {
            ticker,
            period,
            json,
        } => {
            let history = client.fetch_history(&ticker, period).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                println!(
                    "{} ({}) - {} trading days over {}",
                    history.display_name(),
                    history.series.symbol,
                    history.series.len(),
                    period.label()
                );
                for point in &history.series.points {
                    println!("{}  {:>12.2}", point.date, point.close);
                }
            }
        }
    }

    Ok(())
}

fn print_analysis(
    history_a: &TickerHistory,
    history_b: &TickerHistory,
    analysis: &PairAnalysis,
    period: Period,
    window_days: u32,
) {
    let name_a = history_a.display_name();
    let name_b = history_b.display_name();

    println!("Pair analysis: {} vs {} ({})", name_a, name_b, period.label());
    if let (Some(start), Some(end)) = (analysis.start_date(), analysis.end_date()) {
        println!(
            "Aligned range: {} to {} ({} shared dates, {} return rows)",
            start,
            end,
            analysis.aligned.len(),
            analysis.returns.len()
        );
    }
    println!();

    match analysis.correlation.value() {
        Some(value) => {
            let label = Interpretation::classify(value, &StrengthThresholds::default());
            println!("Daily-return correlation: {value:.4} ({label})");
            println!("  {}", label.guidance());
        }
        None => {
            println!("Daily-return correlation: undefined (one series has zero variance)");
        }
    }
    println!();

    if let Some(last) = analysis.rolling.last() {
        println!(
            "Rolling correlation ({window_days}-day window, {} points, latest {} = {:.4})",
            analysis.rolling.len(),
            last.date,
            last.value
        );
        for point in analysis.rolling.iter().rev().take(5).rev() {
            println!("  {}  {:>8.4}", point.date, point.value);
        }
    } else {
        println!("Rolling correlation: no window of {window_days} return rows was satisfied");
    }
    println!();

    print_stats(name_a, &analysis.stats_a);
    print_stats(name_b, &analysis.stats_b);
}

fn print_stats(name: &str, stats: &SummaryStats) {
    println!("Daily returns - {name}");
    println!("  count   {:>10}", stats.count);
    println!("  mean    {:>10.4}", stats.mean);
    println!("  std     {:>10.4}", stats.std_dev);
    println!("  min     {:>10.4}", stats.min);
    println!("  25%     {:>10.4}", stats.q25);
    println!("  50%     {:>10.4}", stats.median);
    println!("  75%     {:>10.4}", stats.q75);
    println!("  max     {:>10.4}", stats.max);
}
