use clap::Parser;
use hdrhistogram::Histogram;
use hyper::{Body, Client, StatusCode, Uri};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of concurrent clients
    #[arg(short, long, default_value = "1")]
    concurrency: usize,

    /// INTERVAL ms
    #[arg(short, long, default_value = "100")]
    interval: u64,

    /// Duration of the benchmark in seconds
    #[arg(short, long, default_value = "30")]
    duration: u64,

    /// Server address
    #[arg(short, long, default_value = "http://127.0.0.1:4000")]
    server: String,

    /// Requesting user ids are drawn from 1..=users
    #[arg(short, long, default_value = "1000")]
    users: i64,

    /// Album to search in
    #[arg(short, long, default_value = "1")]
    album: i64,
}

#[derive(Default)]
struct Totals {
    requests: u64,
    failures: u64,
    proposals: u64,
}

async fn health_check(server: &str) -> anyhow::Result<()> {
    let uri: Uri = format!("{}/health", server).parse()?;
    let response = Client::new().get(uri).await?;
    if response.status() != StatusCode::OK {
        anyhow::bail!("health check returned {}", response.status());
    }
    Ok(())
}

async fn find_matches(
    client: &Client<hyper::client::HttpConnector, Body>,
    server: &str,
    user_id: i64,
    album_id: i64,
) -> anyhow::Result<usize> {
    let uri: Uri =
        format!("{}/users/{}/albums/{}/matches", server, user_id, album_id).parse()?;
    let response = client.get(uri).await?;
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await?;
    if status != StatusCode::OK {
        anyhow::bail!("{}: {}", status, String::from_utf8_lossy(&body));
    }
    let proposals: Vec<serde_json::Value> = serde_json::from_slice(&body)?;
    Ok(proposals.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::try_init().unwrap_or_default();
    let args = Args::parse();

    let histogram = Arc::new(Mutex::new(Histogram::<u64>::new(3)?));
    let totals = Arc::new(Mutex::new(Totals::default()));

    println!(
        "Starting benchmark with {} concurrent clients, target INTERVAL: {}",
        args.concurrency, args.interval
    );

    health_check(&args.server).await?;

    // Spawn client tasks
    let mut handles = vec![];
    for _ in 0..args.concurrency {
        let server = args.server.clone();
        let histogram = histogram.clone();
        let totals = totals.clone();
        let users = args.users.max(1);
        let album = args.album;
        let interval = args.interval;

        let handle = tokio::spawn(async move {
            let client = Client::new();

            loop {
                let user_id = rand::thread_rng().gen_range(1..=users);
                let start = Instant::now();

                match find_matches(&client, &server, user_id, album).await {
                    Ok(count) => {
                        let duration = start.elapsed();
                        if let Err(e) = histogram
                            .lock()
                            .await
                            .record(duration.as_micros() as u64)
                        {
                            log::warn!("latency out of range: {}", e);
                        }
                        let mut totals = totals.lock().await;
                        totals.requests += 1;
                        totals.proposals += count as u64;
                    }
                    Err(e) => {
                        log::warn!("Request failed: {}", e);
                        totals.lock().await.failures += 1;
                    }
                }

                sleep(Duration::from_millis(interval)).await;
            }
        });

        handles.push(handle);
    }

    // Run for specified duration
    sleep(Duration::from_secs(args.duration)).await;

    // Cancel all tasks
    for handle in handles {
        handle.abort();
    }

    // Print statistics
    let totals = totals.lock().await;
    let hist = histogram.lock().await;

    println!("\nBenchmark Results:");
    println!("Total Requests: {}", totals.requests);
    println!("Failed Requests: {}", totals.failures);
    println!(
        "Average TPS: {:.2}",
        totals.requests as f64 / args.duration as f64
    );
    if totals.requests > 0 {
        println!(
            "Average proposals per search: {:.2}",
            totals.proposals as f64 / totals.requests as f64
        );
    }
    println!("\nLatency Distribution (microseconds):");
    println!("p50: {}", hist.value_at_percentile(50.0));
    println!("p90: {}", hist.value_at_percentile(90.0));
    println!("p95: {}", hist.value_at_percentile(95.0));
    println!("p99: {}", hist.value_at_percentile(99.0));
    println!("p99.9: {}", hist.value_at_percentile(99.9));

    Ok(())
}
