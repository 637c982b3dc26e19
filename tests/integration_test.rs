use async_trait::async_trait;
use kitchen_sim::config::{ConfigError, SimulationConfig};
use kitchen_sim::lifecycle::{self, Restaurant, RunReport, StartupError};
use kitchen_sim::model::{ActorKind, OrderAction, OrderEvent, OrderId};
use kitchen_sim::sink::{EventSink, FileEventLog, MemoryEventLog, SinkError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Generous upper bound; a run that takes longer than this is deadlocked.
const DEADLINE: Duration = Duration::from_secs(20);

async fn run_to_completion(config: SimulationConfig, log: Arc<MemoryEventLog>) -> RunReport {
    tokio::time::timeout(DEADLINE, lifecycle::run(config, log))
        .await
        .expect("simulation did not finish")
        .expect("an actor failed")
}

fn order_ids(log: &MemoryEventLog, action: OrderAction) -> Vec<usize> {
    log.with_action(action).iter().map(|event| event.order.0).collect()
}

fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
    ids.sort_unstable();
    ids
}

/// One chef, one waiter, three orders: every order shows up once per action.
#[tokio::test]
async fn test_single_actor_pair_processes_every_order() {
    let log = Arc::new(MemoryEventLog::new());
    let config = SimulationConfig::new(1, 1, 3, 2, 2).unwrap();

    let report = run_to_completion(config, log.clone()).await;

    assert_eq!(report.orders_placed, 3);
    assert_eq!(report.orders_processed, 3);
    assert_eq!(report.orders_served, 3);
    assert_eq!(report.waiters_joined, 1);
    assert_eq!(report.chefs_joined, 1);

    assert_eq!(log.count(OrderAction::Placed), 3);
    assert_eq!(log.count(OrderAction::Prepared), 3);
    assert_eq!(log.count(OrderAction::Served), 3);
    assert_eq!(order_ids(&log, OrderAction::Placed), vec![0, 1, 2]);
    // A single chef drains a FIFO queue, so preparation follows placement order.
    assert_eq!(order_ids(&log, OrderAction::Prepared), vec![0, 1, 2]);
    assert_eq!(order_ids(&log, OrderAction::Served), vec![0, 1, 2]);

    assert!(log
        .with_action(OrderAction::Prepared)
        .iter()
        .all(|event| event.kind == ActorKind::Chef && event.actor_id == 0));
}

/// Capacity-one queues with contention on both sides must not deadlock.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unit_capacities_complete_without_deadlock() {
    let log = Arc::new(MemoryEventLog::new());
    let config = SimulationConfig::new(2, 2, 5, 1, 1).unwrap();

    let report = run_to_completion(config, log.clone()).await;

    assert_eq!(report.orders_placed, 5);
    assert_eq!(report.orders_processed, 5);
    assert_eq!(report.orders_served, 5);
    assert_eq!(report.waiters_joined, 2);
    assert_eq!(report.chefs_joined, 2);
    assert_eq!(order_ids(&log, OrderAction::Placed), vec![0, 1, 2, 3, 4]);
    assert_eq!(sorted(order_ids(&log, OrderAction::Served)), vec![0, 1, 2, 3, 4]);
}

/// A spread of actor counts and queue sizes, on a single-threaded runtime.
#[tokio::test]
async fn test_configuration_matrix_terminates_on_current_thread() {
    let cases = [
        (1, 1, 1, 1, 1),
        (1, 4, 12, 1, 3),
        (4, 1, 12, 3, 1),
        (3, 3, 20, 2, 2),
        (5, 2, 17, 4, 1),
        (2, 6, 9, 1, 5),
    ];
    for (chefs, waiters, orders, placement, prepared) in cases {
        let log = Arc::new(MemoryEventLog::new());
        let config = SimulationConfig::new(chefs, waiters, orders, placement, prepared).unwrap();
        let report = run_to_completion(config, log.clone()).await;

        let expected: Vec<usize> = (0..orders).collect();
        assert_eq!(report.orders_served, orders, "case {:?}", (chefs, waiters, orders));
        assert_eq!(order_ids(&log, OrderAction::Placed), expected);
        assert_eq!(sorted(order_ids(&log, OrderAction::Prepared)), expected);
        assert_eq!(sorted(order_ids(&log, OrderAction::Served)), expected);
    }
}

/// Samples the shared state throughout a timed run and checks every bound.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounds_hold_throughout_run() {
    let orders = 30;
    let (placement_cap, prepared_cap) = (3, 2);
    let log = Arc::new(MemoryEventLog::new());
    let config = SimulationConfig::new(3, 4, orders, placement_cap, prepared_cap)
        .unwrap()
        .with_timings(
            Duration::from_millis(1),
            Duration::from_millis(3),
            Duration::from_millis(2),
        );

    let restaurant = Restaurant::open(config, log.clone());
    let state = restaurant.state().clone();
    let finished = Arc::new(AtomicBool::new(false));

    let monitor = {
        let finished = finished.clone();
        let state = state.clone();
        tokio::spawn(async move {
            let mut samples = 0;
            while !finished.load(Ordering::SeqCst) {
                let snapshot = state.snapshot();
                assert!(snapshot.orders_placed <= orders);
                assert!(snapshot.orders_processed <= orders);
                assert!(snapshot.orders_served <= orders);
                assert!(snapshot.orders_processed <= snapshot.orders_placed);
                assert!(snapshot.current_order_placed <= placement_cap);
                assert!(snapshot.placement_queue_len <= placement_cap);
                assert!(snapshot.prepared_queue_len <= prepared_cap);
                assert!(snapshot.place_permits_available <= placement_cap);
                samples += 1;
                tokio::time::sleep(Duration::from_micros(200)).await;
            }
            samples
        })
    };

    let report = tokio::time::timeout(DEADLINE, restaurant.wait())
        .await
        .expect("simulation did not finish")
        .unwrap();
    finished.store(true, Ordering::SeqCst);
    let samples = monitor.await.expect("an invariant was violated");

    assert!(samples > 0);
    assert_eq!(report.orders_placed, orders);
    assert_eq!(report.orders_processed, orders);
    assert_eq!(report.orders_served, orders);

    // No permit leaks: every pool is full again once all actors have joined.
    assert_eq!(state.place_permits().available(), placement_cap);
    assert_eq!(state.chef_permits().available(), prepared_cap);
    assert_eq!(state.serve_permits().available(), prepared_cap);
}

/// Every action for an order happens after the one before it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_order_is_placed_then_prepared_then_served() {
    let log = Arc::new(MemoryEventLog::new());
    let config = SimulationConfig::new(3, 3, 25, 2, 3).unwrap();
    run_to_completion(config, log.clone()).await;

    let events = log.events();
    for order in 0..25 {
        let position = |action: OrderAction| {
            events
                .iter()
                .position(|event| event.order == OrderId(order) && event.action == action)
                .unwrap_or_else(|| panic!("order {order} missing {action}"))
        };
        assert!(position(OrderAction::Placed) < position(OrderAction::Prepared));
        assert!(position(OrderAction::Prepared) < position(OrderAction::Served));
    }
}

/// Same configuration, fresh sinks: same number of events per action.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reruns_produce_same_event_counts() {
    let config = SimulationConfig::new(2, 3, 15, 2, 2).unwrap();
    let mut counts = vec![];
    for _ in 0..3 {
        let log = Arc::new(MemoryEventLog::new());
        run_to_completion(config.clone(), log.clone()).await;
        counts.push((
            log.count(OrderAction::Placed),
            log.count(OrderAction::Prepared),
            log.count(OrderAction::Served),
        ));
    }
    assert!(counts.iter().all(|c| *c == (15, 15, 15)), "{counts:?}");
}

/// Event-log failures are reported but never stop the run.
struct BrokenSink;

#[async_trait]
impl EventSink for BrokenSink {
    async fn record(&self, _event: &OrderEvent) -> Result<(), SinkError> {
        Err(SinkError::Write(std::io::Error::other("disk full")))
    }
}

#[tokio::test]
async fn test_sink_failures_do_not_stop_the_run() {
    let config = SimulationConfig::new(2, 2, 6, 2, 2).unwrap();
    let report = tokio::time::timeout(DEADLINE, lifecycle::run(config, Arc::new(BrokenSink)))
        .await
        .expect("simulation did not finish")
        .unwrap();

    assert_eq!(report.orders_placed, 6);
    assert_eq!(report.orders_processed, 6);
    assert_eq!(report.orders_served, 6);
}

/// Full run against the file log, in the line format of the order log.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_log_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.txt");
    let sink = FileEventLog::open(&path).await.unwrap();

    let config = SimulationConfig::new(1, 1, 3, 2, 2).unwrap();
    tokio::time::timeout(DEADLINE, lifecycle::run(config, Arc::new(sink)))
        .await
        .expect("simulation did not finish")
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 9);
    for order in 0..3 {
        for action in ["Order Placed", "Order Prepared", "Order Served"] {
            let suffix = format!(": {action} - Order {order}");
            assert_eq!(
                lines.iter().filter(|line| line.ends_with(&suffix)).count(),
                1,
                "expected exactly one line ending with {suffix:?}"
            );
        }
    }
    assert!(lines.iter().all(|line| line.starts_with('[')));
    assert!(lines
        .iter()
        .filter(|line| line.contains("Order Prepared"))
        .all(|line| line.contains("] Chef 0: ")));
}

#[tokio::test]
async fn test_short_settings_file_writes_no_log() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.txt");
    let log_path = dir.path().join("log.txt");
    std::fs::write(&config_path, "1\n1\n5\n0\n0\n0\n2\n").unwrap();

    let err = lifecycle::run_from_files(&config_path, &log_path)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StartupError::Config(ConfigError::WrongCount { found: 7 })
    ));
    assert!(!log_path.exists());
}

#[tokio::test]
async fn test_settings_file_run_appends_to_log() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.txt");
    let log_path = dir.path().join("log.txt");
    std::fs::write(&config_path, "1\n2\n4\n0\n0\n0\n2\n2\n").unwrap();

    let report = tokio::time::timeout(DEADLINE, lifecycle::run_from_files(&config_path, &log_path))
        .await
        .expect("simulation did not finish")
        .unwrap();

    assert_eq!(report.orders_served, 4);
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 12);
}
