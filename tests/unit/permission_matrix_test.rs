// Permission matrix and state machine tests
//
// Every documented row of the matrix, the wire decoding of the overloaded
// status codes, and the legal transitions.

use billing_console::core::{EngineError, PolicyError};
use billing_console::modules::invoices::{
    permissions_for, resolve, DocumentKind, InvoiceAction, InvoiceEvent, InvoicePermissions,
    InvoiceStateMachine, InvoiceStatus, RefundStatus,
};

fn row(p: InvoicePermissions) -> [bool; 9] {
    [
        p.editable,
        p.savable,
        p.creatable,
        p.publishable,
        p.revokable,
        p.deletable,
        p.refundable,
        p.downloadable,
        p.sendable,
    ]
}

#[test]
fn test_matrix_rows() {
    let cases = [
        (1, false, [true, true, true, true, false, true, false, false, false]),
        (2, false, [false, false, false, false, true, false, false, false, true]),
        (3, false, [false, false, false, false, false, false, true, true, true]),
        (4, false, [false; 9]),
        (5, false, [false; 9]),
        (2, true, [false, false, false, false, false, false, false, true, false]),
        (3, true, [false, false, false, false, false, false, false, true, false]),
        (4, true, [false; 9]),
        (5, true, [false; 9]),
    ];

    for (status, has_refund, expected) in cases {
        for has_split_payment in [false, true] {
            let p = resolve(status, has_refund, has_split_payment).unwrap();
            assert_eq!(
                row(p),
                expected,
                "status {} refund {} split {}",
                status,
                has_refund,
                has_split_payment
            );
        }
    }
}

#[test]
fn test_matrix_is_pure() {
    let kind = DocumentKind::Invoice(InvoiceStatus::Paid);
    assert_eq!(permissions_for(kind, true), permissions_for(kind, true));
    assert_eq!(permissions_for(kind, false), permissions_for(kind, true));
}

#[test]
fn test_unknown_wire_states() {
    for (status, has_refund) in [(0, false), (6, false), (1, true), (-1, true)] {
        let err = resolve(status, has_refund, false).unwrap_err();
        assert!(matches!(err, EngineError::UnknownInvoiceState { .. }));
    }
}

#[test]
fn test_delete_on_awaiting_payment_is_denied() {
    let p = permissions_for(DocumentKind::Invoice(InvoiceStatus::AwaitingPayment), false);
    assert_eq!(
        p.ensure(InvoiceAction::Delete),
        Err(PolicyError::PermissionDenied(InvoiceAction::Delete))
    );
}

#[test]
fn test_every_permitted_mutation_has_a_transition() {
    let cases = [
        (DocumentKind::Invoice(InvoiceStatus::Draft), InvoiceAction::Publish, InvoiceEvent::Publish),
        (DocumentKind::Invoice(InvoiceStatus::Draft), InvoiceAction::Delete, InvoiceEvent::Delete),
        (
            DocumentKind::Invoice(InvoiceStatus::AwaitingPayment),
            InvoiceAction::Revoke,
            InvoiceEvent::Revoke,
        ),
        (
            DocumentKind::Invoice(InvoiceStatus::Paid),
            InvoiceAction::Refund,
            InvoiceEvent::RefundRequested,
        ),
    ];

    for (kind, action, event) in cases {
        assert!(permissions_for(kind, false).allows(action));
        assert!(InvoiceStateMachine::can_apply(kind, event), "{} {:?}", kind, event);
    }
}

#[test]
fn test_backend_driven_transitions() {
    let awaiting = DocumentKind::Invoice(InvoiceStatus::AwaitingPayment);
    assert_eq!(
        InvoiceStateMachine::next(awaiting, InvoiceEvent::PaymentConfirmed),
        Ok(DocumentKind::Invoice(InvoiceStatus::Paid))
    );
    assert_eq!(
        InvoiceStateMachine::next(awaiting, InvoiceEvent::PaymentExpired),
        Ok(DocumentKind::Invoice(InvoiceStatus::Failed))
    );

    let refunding = DocumentKind::CreditNote(RefundStatus::AwaitingRefund);
    assert_eq!(
        InvoiceStateMachine::next(refunding, InvoiceEvent::RefundFailed),
        Ok(DocumentKind::CreditNote(RefundStatus::Failed))
    );
    assert_eq!(
        InvoiceStateMachine::next(refunding, InvoiceEvent::RefundCancelled),
        Ok(DocumentKind::CreditNote(RefundStatus::Cancelled))
    );
}

#[test]
fn test_final_states_accept_no_events() {
    let finals = [
        DocumentKind::Invoice(InvoiceStatus::Failed),
        DocumentKind::Invoice(InvoiceStatus::Cancelled),
        DocumentKind::CreditNote(RefundStatus::Refunded),
        DocumentKind::CreditNote(RefundStatus::Failed),
        DocumentKind::CreditNote(RefundStatus::Cancelled),
    ];
    let events = [
        InvoiceEvent::Publish,
        InvoiceEvent::Revoke,
        InvoiceEvent::Delete,
        InvoiceEvent::PaymentConfirmed,
        InvoiceEvent::PaymentExpired,
        InvoiceEvent::RefundRequested,
        InvoiceEvent::RefundSettled,
        InvoiceEvent::RefundFailed,
        InvoiceEvent::RefundCancelled,
    ];

    for kind in finals {
        assert!(kind.is_final());
        for event in events {
            assert!(!InvoiceStateMachine::can_apply(kind, event), "{} {:?}", kind, event);
        }
    }
}
