//! Drive a congestion strategy against a synthetic bottleneck link.
//!
//! Each round the whole window is sent. Segments beyond the path's BDP queue
//! at the bottleneck and inflate the RTT; once the queue overflows the buffer
//! a loss is signalled. Reordering can be injected to push the connection out
//! of the Open phase.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use honey::{
    CaState, CongestionControl, CongestionControlAlgorithm, CongestionControlConfig,
    CongestionController, HostConnection,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(about = "Simulate a congestion control strategy over a bottleneck link")]
struct SimArgs {
    /// TOML file with the congestion control configuration.
    #[arg(long, env = "HONEY_CONFIG")]
    config: Option<PathBuf>,

    /// Strategy to run; overrides the config file.
    #[arg(long)]
    algorithm: Option<CongestionControlAlgorithm>,

    /// Number of round trips to simulate.
    #[arg(long, default_value_t = 200)]
    rounds: u32,

    /// Propagation RTT of the path in milliseconds.
    #[arg(long, default_value_t = 50)]
    base_rtt_ms: u32,

    /// Bandwidth-delay product of the path, in segments.
    #[arg(long, default_value_t = 100)]
    bdp: u32,

    /// Bottleneck buffer, in segments.
    #[arg(long, default_value_t = 100)]
    buffer: u32,

    /// Relative RTT jitter, e.g. 0.1 for ±10%.
    #[arg(long, default_value_t = 0.05)]
    jitter: f64,

    /// Probability per round of a reordering episode.
    #[arg(long, default_value_t = 0.0)]
    reorder: f64,

    /// RNG seed for jitter and reordering.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<LevelFilter>,

    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    algorithm: String,
    rounds: u32,
    final_cwnd: u32,
    peak_cwnd: u32,
    mean_cwnd: f64,
    losses: u32,
    reorder_episodes: u32,
    stats: honey::CongestionControlStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    honey: Option<honey::HoneyStats>,
}

struct Link {
    base_rtt_us: u32,
    bdp: u32,
    buffer: u32,
    jitter: f64,
    rng: SmallRng,
}

enum RoundOutcome {
    Delivered { rtt_us: i32 },
    Dropped,
}

impl Link {
    fn send_window(&mut self, cwnd: u32) -> RoundOutcome {
        let queued = cwnd.saturating_sub(self.bdp);
        if queued > self.buffer {
            return RoundOutcome::Dropped;
        }
        let queue_delay = f64::from(self.base_rtt_us) * f64::from(queued) / f64::from(self.bdp.max(1));
        let rtt = f64::from(self.base_rtt_us) + queue_delay;
        let rtt = if self.jitter > 0.0 {
            rtt * self.rng.gen_range(1.0 - self.jitter..=1.0 + self.jitter)
        } else {
            rtt
        };
        RoundOutcome::Delivered {
            rtt_us: rtt.clamp(1.0, f64::from(i32::MAX)) as i32,
        }
    }
}

fn init_tracer(level: Option<LevelFilter>) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let default_filter = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter_layer = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.unwrap_or(default_filter).into())
        .from_env_lossy();

    let use_json = std::env::var("HONEY_LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);
    let fmt_layer = if use_json {
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn run(args: &SimArgs) -> anyhow::Result<Report> {
    let mut config = match &args.config {
        Some(path) => CongestionControlConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CongestionControlConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config = config.with_algorithm(algorithm);
    }
    config.validate()?;

    if args.bdp == 0 {
        anyhow::bail!("--bdp must be at least one segment");
    }
    if !(0.0..1.0).contains(&args.jitter) {
        anyhow::bail!("--jitter must be within [0, 1), got {}", args.jitter);
    }
    if !(0.0..=1.0).contains(&args.reorder) {
        anyhow::bail!("--reorder must be a probability, got {}", args.reorder);
    }

    let mut link = Link {
        base_rtt_us: args.base_rtt_ms.saturating_mul(1000),
        bdp: args.bdp,
        buffer: args.buffer,
        jitter: args.jitter,
        rng: SmallRng::seed_from_u64(args.seed),
    };
    let mut reorder_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1));

    let mut conn = HostConnection::new(
        CongestionController::new(config.algorithm),
        config.initial_window(),
    );

    tracing::info!(
        algorithm = %config.algorithm,
        base_rtt_ms = args.base_rtt_ms,
        bdp = args.bdp,
        buffer = args.buffer,
        "Starting simulation"
    );

    let mut losses = 0;
    let mut reorder_episodes = 0;
    let mut peak_cwnd = conn.window().cwnd;
    let mut cwnd_sum = 0u64;

    for round in 0..args.rounds {
        // Leave whatever reduction or reordering the previous round caused.
        if conn.ca_state() != CaState::Open {
            conn.on_recovered();
        }
        if args.reorder > 0.0 && reorder_rng.gen_bool(args.reorder) {
            reorder_episodes += 1;
            conn.enter_state(CaState::Disorder);
        }

        let cwnd = conn.window().cwnd;
        cwnd_sum += u64::from(cwnd);
        peak_cwnd = peak_cwnd.max(cwnd);

        match link.send_window(cwnd) {
            RoundOutcome::Delivered { rtt_us } => {
                conn.on_ack(round, cwnd, rtt_us);
                tracing::debug!(
                    round,
                    cwnd,
                    rtt_us,
                    state = %conn.ca_state(),
                    "Round delivered"
                );
            }
            RoundOutcome::Dropped => {
                losses += 1;
                conn.on_loss();
                tracing::info!(
                    round,
                    cwnd,
                    ssthresh = conn.window().ssthresh,
                    new_cwnd = conn.window().cwnd,
                    "Bottleneck overflow"
                );
            }
        }
    }

    let controller = conn.controller();
    Ok(Report {
        algorithm: controller.name().to_owned(),
        rounds: args.rounds,
        final_cwnd: conn.window().cwnd,
        peak_cwnd,
        mean_cwnd: cwnd_sum as f64 / f64::from(args.rounds.max(1)),
        losses,
        reorder_episodes,
        stats: controller.stats(),
        honey: controller.honey_stats(),
    })
}

fn main() -> anyhow::Result<()> {
    let args = SimArgs::parse();
    init_tracer(args.log_level)?;

    let report = run(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}: {} rounds, final cwnd {}, peak {}, mean {:.1}, {} losses, {} reorder episodes",
            report.algorithm,
            report.rounds,
            report.final_cwnd,
            report.peak_cwnd,
            report.mean_cwnd,
            report.losses,
            report.reorder_episodes,
        );
        if let Some(stats) = &report.honey {
            println!(
                "rtt floor {}us, latest {}us, congested rounds {}, baseline rounds {}, clamp hits {}",
                stats.rtt_min_us,
                stats.rtt_latest_us,
                stats.congested_rounds,
                stats.baseline_rounds,
                stats.clamp_hits,
            );
        }
    }
    Ok(())
}
