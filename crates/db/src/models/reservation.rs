//! Item reservations and their viewer-scoped projection.
//!
//! The same reservation list is rendered two ways: owners see every
//! reserver's full name and timestamp, everyone else only sees a count and
//! initials.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wishly_core::engagement::Viewer;
use wishly_core::reservation::initials;
use wishly_core::types::{DbId, Timestamp};

/// A row from the `item_reservations` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub item_id: DbId,
    pub name: String,
    pub reserved_at: Timestamp,
}

/// Body of the claim/unclaim endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ReserverName {
    pub name: String,
}

/// Result of removing a reservation by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreserved {
    pub reservation: Reservation,
    /// Reservations left on the item after the removal.
    pub remaining: i64,
}

/// Owner-visible reservation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationEntry {
    pub id: DbId,
    pub name: String,
    pub reserved_at: Timestamp,
}

/// Reservation data attached to an item, shaped for its viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReservationView {
    Owner {
        reservations_count: i64,
        is_claimed: bool,
        /// Name on the oldest reservation.
        claimed_by: Option<String>,
        reservations: Vec<ReservationEntry>,
    },
    Public {
        reservations_count: i64,
        is_claimed: bool,
        reserver_initials: Vec<String>,
    },
}

impl ReservationView {
    pub fn reservations_count(&self) -> i64 {
        match self {
            ReservationView::Owner {
                reservations_count, ..
            }
            | ReservationView::Public {
                reservations_count, ..
            } => *reservations_count,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.reservations_count() > 0
    }
}

/// Project one item's reservations (oldest first) for `viewer`.
pub fn project(reservations: &[Reservation], viewer: Viewer) -> ReservationView {
    let reservations_count = reservations.len() as i64;
    let is_claimed = reservations_count > 0;

    match viewer {
        Viewer::Owner => ReservationView::Owner {
            reservations_count,
            is_claimed,
            claimed_by: reservations.first().map(|r| r.name.clone()),
            reservations: reservations
                .iter()
                .map(|r| ReservationEntry {
                    id: r.id,
                    name: r.name.clone(),
                    reserved_at: r.reserved_at,
                })
                .collect(),
        },
        Viewer::Public => ReservationView::Public {
            reservations_count,
            is_claimed,
            reserver_initials: reservations.iter().map(|r| initials(&r.name)).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn reservations(names: &[&str]) -> Vec<Reservation> {
        let start = Utc::now();
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Reservation {
                id: i as DbId + 1,
                item_id: 10,
                name: name.to_string(),
                reserved_at: start + Duration::seconds(i as i64),
            })
            .collect()
    }

    #[test]
    fn public_projection_hides_names() {
        let view = project(&reservations(&["Chioma", "Tunde"]), Viewer::Public);

        assert_eq!(
            view,
            ReservationView::Public {
                reservations_count: 2,
                is_claimed: true,
                reserver_initials: vec!["C".into(), "T".into()],
            }
        );

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("Chioma"));
        assert!(!json.contains("Tunde"));
    }

    #[test]
    fn owner_projection_exposes_names_and_timestamps() {
        let rows = reservations(&["Chioma", "Tunde"]);
        let view = project(&rows, Viewer::Owner);

        match view {
            ReservationView::Owner {
                reservations_count,
                is_claimed,
                claimed_by,
                reservations,
            } => {
                assert_eq!(reservations_count, 2);
                assert!(is_claimed);
                assert_eq!(claimed_by.as_deref(), Some("Chioma"));
                assert_eq!(reservations[1].name, "Tunde");
                assert_eq!(reservations[1].reserved_at, rows[1].reserved_at);
            }
            other => panic!("expected owner projection, got {other:?}"),
        }
    }

    #[test]
    fn empty_projection_is_unclaimed() {
        let view = project(&[], Viewer::Public);
        assert!(!view.is_claimed());
        assert_eq!(view.reservations_count(), 0);

        let json = serde_json::to_value(project(&[], Viewer::Owner)).unwrap();
        assert_eq!(json["claimed_by"], serde_json::Value::Null);
        assert_eq!(json["reservations"], serde_json::json!([]));
    }
}
