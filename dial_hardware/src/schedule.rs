//! Calendar-derived target classification.
//!
//! Pure rules only: fetching the next event (API, auth, token cache) is an
//! external collaborator; whatever produces an [`UpcomingEvent`] can be
//! plugged into [`ScheduleTargets`]. The rules reproduce the deployed
//! mapping from the next calendar event to a dial station.

use dial_traits::TargetSource;

pub const OUT_OF_OFFICE: u8 = 0;
pub const WORK_FROM_HOME: u8 = 1;
pub const GOING_TO_EVENT: u8 = 2;
pub const FOCUS_TIME: u8 = 3;
pub const AVAILABLE: u8 = 4;
pub const IN_MEETING: u8 = 5;

/// Events further out than this leave the dial on "available".
pub const AVAILABLE_LEAD_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Ordinary meeting.
    Default,
    FocusTime,
    OutOfOffice,
    /// Working-location entry; `office` is whether it names the office.
    WorkingLocation { office: bool },
}

#[derive(Debug, Clone, Copy)]
pub struct UpcomingEvent {
    pub kind: EventKind,
    /// Seconds until the event starts; negative once it has started.
    pub starts_in_secs: i64,
}

/// Map the next event to a station, or `None` for "no change".
///
/// Working-location entries short-circuit: a non-office one means working
/// from home regardless of timing, and an office one carries no status of
/// its own. Everything else is classified by lead time first, then by kind.
pub fn classify(event: &UpcomingEvent) -> Option<u8> {
    match event.kind {
        EventKind::WorkingLocation { office: false } => Some(WORK_FROM_HOME),
        EventKind::WorkingLocation { office: true } => None,
        kind => {
            if event.starts_in_secs >= AVAILABLE_LEAD_SECS {
                Some(AVAILABLE)
            } else if event.starts_in_secs > 0 {
                Some(GOING_TO_EVENT)
            } else {
                match kind {
                    EventKind::OutOfOffice => Some(OUT_OF_OFFICE),
                    EventKind::FocusTime => Some(FOCUS_TIME),
                    EventKind::Default => Some(IN_MEETING),
                    EventKind::WorkingLocation { .. } => None,
                }
            }
        }
    }
}

/// Target source over any event fetcher. Fetcher failures surface as `None`
/// (no event, API error, empty calendar) and the dial stays put.
pub struct ScheduleTargets<F> {
    fetch: F,
}

impl<F: FnMut() -> Option<UpcomingEvent>> ScheduleTargets<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F: FnMut() -> Option<UpcomingEvent>> TargetSource for ScheduleTargets<F> {
    fn next_station(&mut self) -> Option<u8> {
        let event = (self.fetch)()?;
        let station = classify(&event);
        match station {
            Some(s) => tracing::debug!(kind = ?event.kind, station = s, "classified next event"),
            None => tracing::debug!(kind = ?event.kind, "event carries no status; staying put"),
        }
        station
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    // An in-progress or imminent event classifies by kind.
    #[case(EventKind::Default, -60, Some(IN_MEETING))]
    #[case(EventKind::OutOfOffice, 0, Some(OUT_OF_OFFICE))]
    #[case(EventKind::FocusTime, -10, Some(FOCUS_TIME))]
    // Anything more than five minutes out means available.
    #[case(EventKind::Default, AVAILABLE_LEAD_SECS, Some(AVAILABLE))]
    #[case(EventKind::OutOfOffice, 3600, Some(AVAILABLE))]
    // Within five minutes: heading to the event.
    #[case(EventKind::Default, 60, Some(GOING_TO_EVENT))]
    #[case(EventKind::FocusTime, 299, Some(GOING_TO_EVENT))]
    // Working-location entries ignore timing entirely.
    #[case(EventKind::WorkingLocation { office: false }, 3600, Some(WORK_FROM_HOME))]
    #[case(EventKind::WorkingLocation { office: true }, 3600, None)]
    fn classification_rules(
        #[case] kind: EventKind,
        #[case] starts_in_secs: i64,
        #[case] expected: Option<u8>,
    ) {
        let event = UpcomingEvent {
            kind,
            starts_in_secs,
        };
        assert_eq!(classify(&event), expected);
    }

    #[test]
    fn fetcher_failure_means_no_change() {
        let mut targets = ScheduleTargets::new(|| None);
        assert_eq!(targets.next_station(), None);
    }

    #[test]
    fn fetcher_output_flows_through_classification() {
        let mut targets = ScheduleTargets::new(|| {
            Some(UpcomingEvent {
                kind: EventKind::Default,
                starts_in_secs: -5,
            })
        });
        assert_eq!(targets.next_station(), Some(IN_MEETING));
    }
}
