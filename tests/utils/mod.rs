use tripline::Journey;

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// No returned journey may dominate another on (arrival, transfer count).
#[allow(dead_code)]
pub fn assert_pareto_minimal(journeys: &[Journey]) {
    for (i, a) in journeys.iter().enumerate() {
        for (j, b) in journeys.iter().enumerate() {
            if i == j {
                continue;
            }
            let dominates = a.arrival <= b.arrival
                && a.nb_of_transfers() <= b.nb_of_transfers()
                && (a.arrival < b.arrival || a.nb_of_transfers() < b.nb_of_transfers());
            assert!(
                !dominates,
                "journey `{}` dominates journey `{}`",
                a, b
            );
        }
    }
}
