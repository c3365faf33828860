use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use codepool::error::{CodepoolError, Field};
use codepool::usecase::allocation::{Allocation, SubmitVisitorUseCase};

use crate::helpers::{
    MockVisitorRepo, form, nth_form, store_with_codes, submit_usecase, used_count, visitor_count,
};

// ── First submission ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_and_claim_earliest_code() {
    let store = store_with_codes(&["FIRST", "SECOND"]);
    let usecase = submit_usecase(&store);

    let out = usecase
        .execute(form("Sara", "Ahmadi", "0012345678", "09121234567"))
        .await
        .unwrap();

    assert!(out.is_new);
    assert_eq!(out.allocation.code(), Some("FIRST"));
    assert!(matches!(out.allocation, Allocation::Claimed(ref c) if c.is_used));
    assert_eq!(out.visitor.discount_code.as_deref(), Some("FIRST"));
    assert_eq!(used_count(&store), 1);
}

#[tokio::test]
async fn should_trim_fields_before_storing() {
    let store = store_with_codes(&["A1"]);
    let out = submit_usecase(&store)
        .execute(form("  Sara ", " Ahmadi", " 0012345678 ", "09121234567  "))
        .await
        .unwrap();

    assert_eq!(out.visitor.first_name, "Sara");
    assert_eq!(out.visitor.last_name, "Ahmadi");
    assert_eq!(out.visitor.national_id, "0012345678");
    assert_eq!(out.visitor.phone, "09121234567");
}

// ── Repeat submission ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_same_code_on_resubmission() {
    let store = store_with_codes(&["A1", "A2", "A3"]);
    let usecase = submit_usecase(&store);

    let first = usecase
        .execute(form("Sara", "Ahmadi", "0012345678", "09121234567"))
        .await
        .unwrap();
    let second = usecase
        .execute(form("Sarah", "Ahmadi-Rad", "0012345678", "09121234567"))
        .await
        .unwrap();

    assert!(!second.is_new);
    assert_eq!(second.visitor.id, first.visitor.id);
    assert_eq!(second.allocation, Allocation::Existing("A1".into()));
    assert_eq!(second.visitor.first_name, "Sarah");
    assert_eq!(second.visitor.last_name, "Ahmadi-Rad");
    assert_eq!(used_count(&store), 1);
    assert_eq!(visitor_count(&store), 1);
}

#[tokio::test]
async fn should_match_existing_visitor_by_phone_alone() {
    let store = store_with_codes(&["A1", "A2"]);
    let usecase = submit_usecase(&store);

    let first = usecase.execute(nth_form(1)).await.unwrap();
    let mut again = nth_form(1);
    again.national_id = "9999999999".into();
    let second = usecase.execute(again).await.unwrap();

    assert_eq!(second.visitor.id, first.visitor.id);
    assert_eq!(second.allocation.code(), Some("A1"));
    assert_eq!(used_count(&store), 1);
}

#[tokio::test]
async fn should_reject_identity_split_across_two_visitors() {
    let store = store_with_codes(&["A1", "A2", "A3"]);
    let usecase = submit_usecase(&store);

    let a = usecase.execute(nth_form(1)).await.unwrap();
    let b = usecase.execute(nth_form(2)).await.unwrap();

    // National id of the first visitor, phone of the second.
    let mixed = form("Mixed", "Up", &a.visitor.national_id, &b.visitor.phone);
    let err = usecase.execute(mixed).await.unwrap_err();

    assert!(matches!(err, CodepoolError::ConflictingIdentity));
    assert_eq!(visitor_count(&store), 2);
    assert_eq!(used_count(&store), 2);
}

// ── Empty pool ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_without_code_when_pool_is_empty() {
    let store = store_with_codes(&[]);
    let out = submit_usecase(&store).execute(nth_form(1)).await.unwrap();

    assert!(out.is_new);
    assert_eq!(out.allocation, Allocation::Unavailable);
    assert_eq!(out.visitor.discount_code, None);
    assert_eq!(visitor_count(&store), 1);
}

#[tokio::test]
async fn should_claim_on_resubmission_after_pool_refill() {
    let store = store_with_codes(&[]);
    let usecase = submit_usecase(&store);

    let first = usecase.execute(nth_form(1)).await.unwrap();
    assert_eq!(first.allocation, Allocation::Unavailable);

    store
        .lock()
        .unwrap()
        .codes
        .push(crate::helpers::test_code("LATE", chrono::Utc::now()));

    let second = usecase.execute(nth_form(1)).await.unwrap();
    assert!(!second.is_new);
    assert_eq!(second.allocation.code(), Some("LATE"));
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_invalid_input_without_writing() {
    let store = store_with_codes(&["A1"]);
    let usecase = submit_usecase(&store);

    let cases = [
        (form("", "Ahmadi", "0012345678", "09121234567"), Field::FirstName, true),
        (form("Sara", "   ", "0012345678", "09121234567"), Field::LastName, true),
        (form("Sara", "Ahmadi", "12345", "09121234567"), Field::NationalId, false),
        (form("Sara", "Ahmadi", "00123456ab", "09121234567"), Field::NationalId, false),
        (form("Sara", "Ahmadi", "0012345678", "08121234567"), Field::Phone, false),
        (form("Sara", "Ahmadi", "0012345678", "0912123456"), Field::Phone, false),
    ];
    for (input, field, missing) in cases {
        let err = usecase.execute(input).await.unwrap_err();
        match err {
            CodepoolError::MissingField(f) if missing => assert_eq!(f, field),
            CodepoolError::InvalidField(f) if !missing => assert_eq!(f, field),
            other => panic!("unexpected error for {field}: {other:?}"),
        }
    }

    assert_eq!(visitor_count(&store), 0);
    assert_eq!(used_count(&store), 0);
}

// ── Races ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_retry_register_after_lost_insert_race() {
    let store = store_with_codes(&["A1"]);
    let usecase = SubmitVisitorUseCase {
        visitors: MockVisitorRepo::with_conflicts(Arc::clone(&store), 1),
    };

    let out = usecase.execute(nth_form(1)).await.unwrap();
    assert_eq!(out.allocation.code(), Some("A1"));
}

#[tokio::test]
async fn should_surface_conflict_after_second_lost_race() {
    let store = store_with_codes(&["A1"]);
    let usecase = SubmitVisitorUseCase {
        visitors: MockVisitorRepo::with_conflicts(Arc::clone(&store), 2),
    };

    let err = usecase.execute(nth_form(1)).await.unwrap_err();
    assert!(matches!(err, CodepoolError::Conflict));
    assert_eq!(used_count(&store), 0);
}

#[tokio::test]
async fn should_hand_distinct_codes_to_concurrent_visitors() {
    const K: usize = 8;
    let codes: Vec<String> = (0..K).map(|i| format!("CODE{i}")).collect();
    let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    let store = store_with_codes(&code_refs);
    let usecase = submit_usecase(&store);

    let results = join_all((0..K).map(|n| usecase.execute(nth_form(n)))).await;

    let claimed: HashSet<String> = results
        .into_iter()
        .map(|r| r.unwrap().allocation.code().unwrap().to_owned())
        .collect();
    assert_eq!(claimed.len(), K);
    assert_eq!(used_count(&store), K);
}

#[tokio::test]
async fn should_leave_exactly_one_visitor_without_code_when_pool_is_short() {
    const K: usize = 5;
    let store = store_with_codes(&["C0", "C1", "C2", "C3", "C4"]);
    let usecase = submit_usecase(&store);

    let results: Vec<_> = join_all((0..=K).map(|n| usecase.execute(nth_form(n))))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let unavailable = results
        .iter()
        .filter(|o| o.allocation == Allocation::Unavailable)
        .count();
    let distinct: HashSet<&str> = results.iter().filter_map(|o| o.allocation.code()).collect();
    assert_eq!(unavailable, 1);
    assert_eq!(distinct.len(), K);
    assert_eq!(used_count(&store), K);
}

#[tokio::test]
async fn should_claim_once_for_concurrent_resubmissions() {
    let store = store_with_codes(&["A1", "A2", "A3"]);
    let usecase = submit_usecase(&store);

    let results = join_all((0..4).map(|_| usecase.execute(nth_form(7)))).await;

    let codes: HashSet<String> = results
        .into_iter()
        .map(|r| r.unwrap().allocation.code().unwrap().to_owned())
        .collect();
    assert_eq!(codes.len(), 1);
    assert_eq!(used_count(&store), 1);
    assert_eq!(visitor_count(&store), 1);
}
