//! Order status state machine
//!
//! Forward-only workflow over a closed enum:
//! `pending(1) -> confirmed(2) -> shipped(3) -> delivered(4)`, plus a
//! terminal `cancelled` reachable from any live state. A transition is
//! valid when the target step is not behind the current one; `cancelled`
//! is always a valid target and never a valid source.

use shared::order::OrderStatus;

use super::error::{OrderError, OrderResult};

/// Validate a status transition, independent of caller identity
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> OrderResult<()> {
    let allowed = match (from, to) {
        // No path back from cancelled
        (OrderStatus::Cancelled, _) => false,
        // Cancelling is always permitted
        (_, OrderStatus::Cancelled) => true,
        // Otherwise strictly forward (or same step)
        (from, to) => to.step() >= from.step(),
    };

    if allowed {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(check_transition(OrderStatus::Pending, OrderStatus::Confirmed).is_ok());
        assert!(check_transition(OrderStatus::Confirmed, OrderStatus::Shipped).is_ok());
        assert!(check_transition(OrderStatus::Shipped, OrderStatus::Delivered).is_ok());
        // Skipping steps forward is allowed (e.g. pending -> shipped)
        assert!(check_transition(OrderStatus::Pending, OrderStatus::Shipped).is_ok());
    }

    #[test]
    fn test_backward_transitions_rejected() {
        for (i, from) in LIVE.iter().enumerate() {
            for to in LIVE.iter().take(i) {
                let result = check_transition(*from, *to);
                assert!(
                    matches!(result, Err(OrderError::InvalidTransition { .. })),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_cancel_allowed_from_any_live_state() {
        for from in LIVE {
            assert!(check_transition(from, OrderStatus::Cancelled).is_ok());
        }
    }

    #[test]
    fn test_no_path_back_from_cancelled() {
        for to in LIVE {
            assert!(check_transition(OrderStatus::Cancelled, to).is_err());
        }
        assert!(check_transition(OrderStatus::Cancelled, OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn test_same_state_is_a_noop_transition() {
        for status in LIVE {
            assert!(check_transition(status, status).is_ok());
        }
    }
}
