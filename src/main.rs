use clap::Parser;
use lambda_runtime::{run, service_fn, LambdaEvent};
use serde_json::Value;
use std::path::PathBuf;
use stream_fanout::config::StrategyKind;
use stream_fanout::sns::SnsTopics;
use stream_fanout::strategy::{EncodedAttribute, StateTransition};
use stream_fanout::{Config, Dispatcher};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "stream-fanout")]
#[command(about = "DynamoDB stream to SNS fan-out handler", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", env = "FANOUT_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Enable JSON output for logs", env = "FANOUT_JSON_LOGS")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting stream-fanout");

    let config = match Config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        strategy = config.strategy.name(),
        attribute = config.strategy.attribute(),
        region = %config.sns.region(),
        endpoint = ?config.sns.endpoint_url,
        "Configuration summary"
    );

    let builder = Dispatcher::builder().transport(SnsTopics::connect(&config.sns).await);
    let attribute = config.strategy.attribute();
    let builder = match config.strategy.kind {
        StrategyKind::Encoded => builder.strategy(EncodedAttribute::new(attribute)),
        StrategyKind::State => builder.strategy(StateTransition::new(attribute)),
    };
    let dispatcher = builder.build()?;

    run(service_fn(move |event: LambdaEvent<Value>| {
        let dispatcher = dispatcher.clone();
        async move {
            dispatcher
                .handle_value(event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("stream_fanout=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("stream_fanout=info,warn"))
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
