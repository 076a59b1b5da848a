//! Walltime ceilings handed to the scheduler.

pub const PHASE_LINKING_STAGE: &str = "phase_linking";
pub const DEBUG_QUEUE: &str = "debug";

pub const PHASE_LINKING_WALLTIME: &str = "40:00";
pub const DEBUG_WALLTIME: &str = "0:30";
pub const DEFAULT_WALLTIME: &str = "4:00";

/// Walltime (`H:MM`) for a stage on a queue.
///
/// Phase linking always gets the extended ceiling; otherwise the debug queue
/// gets its short limit and every other queue the production default.
pub fn resolve_walltime(queue: &str, stage: &str) -> &'static str {
    if stage == PHASE_LINKING_STAGE {
        PHASE_LINKING_WALLTIME
    } else if queue == DEBUG_QUEUE {
        DEBUG_WALLTIME
    } else {
        DEFAULT_WALLTIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_linking_wins_on_every_queue() {
        assert_eq!(resolve_walltime("debug", "phase_linking"), "40:00");
        assert_eq!(resolve_walltime("general", "phase_linking"), "40:00");
        assert_eq!(resolve_walltime("", "phase_linking"), "40:00");
    }

    #[test]
    fn debug_queue_is_short() {
        assert_eq!(resolve_walltime("debug", "merge"), "0:30");
        assert_eq!(resolve_walltime("debug", ""), "0:30");
    }

    #[test]
    fn production_default() {
        assert_eq!(resolve_walltime("normal_queue", "merge"), "4:00");
        assert_eq!(resolve_walltime("Debug", "unwrap"), "4:00");
    }
}
