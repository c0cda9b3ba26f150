use serde_json::{Value, json};

use field_containers::{
    container::{
        filter::filter_list,
        guard::{RemovalDecision, check_before_remove},
        registry::ContainerRegistry,
        resolver::{BindingResolver, TagClasses},
    },
    field::field_model::{Action, ContainerBindings, FieldKind, SelectableField},
    page::host::{FormHost, NoticeKind},
};

use crate::common::pages::{abcd, ids, page, resolve, results, reservation_page, widget};

mod common;

fn leaf(key: &str, bindings: ContainerBindings) -> SelectableField {
    SelectableField {
        key: key.into(),
        name: None,
        field_type: "select".into(),
        label: None,
        kind: FieldKind::Leaf,
        tags: vec![],
        declared: None,
        bindings,
        children: vec![],
    }
}

fn pushes(container: &str) -> ContainerBindings {
    ContainerBindings {
        supplies: Some(container.into()),
        ..Default::default()
    }
}

// =========================================================================
// Registry
// =========================================================================

#[test]
fn set_is_idempotent() {
    let mut registry = ContainerRegistry::new();
    let field = leaf("acf-field_a", pushes("x"));

    assert_eq!(registry.set(&field), 1);
    assert_eq!(registry.set(&field), 0);
    assert_eq!(registry.set(&field), 0);

    let container = registry.container("x").expect("created lazily");
    assert_eq!(container.push, vec!["acf-field_a"]);
    assert!(container.exclude.is_empty());
}

#[test]
fn set_records_push_and_exclude_but_not_include() {
    let mut registry = ContainerRegistry::new();
    let field = leaf(
        "acf-field_a",
        ContainerBindings {
            supplies: Some("x".into()),
            includes_from: Some("y".into()),
            excludes_from: Some("z".into()),
        },
    );

    registry.set(&field);

    assert_eq!(registry.container("x").map(|c| c.keys(Action::Push).len()), Some(1));
    assert_eq!(registry.container("z").map(|c| c.keys(Action::Exclude).len()), Some(1));
    assert!(registry.container("y").is_none(), "include never registers");
}

#[test]
fn resolver_binds_leaves_and_seeds_the_registry() {
    let (index, registry, _host) = resolve(reservation_page());

    let authors = index.get("acf-field_authors").expect("authors");
    assert_eq!(authors.bindings.container_for(Action::Push), Some("people"));

    let lead = index.get("acf-field_lead").expect("lead");
    assert_eq!(lead.bindings.container_for(Action::Include), Some("people"));

    assert!(!index.get("acf-field_notes").expect("notes").is_bound());
    assert!(!index.get("group_main").expect("root").is_bound(), "groups are never bound");

    assert_eq!(registry.names(), vec!["people"]);
    assert_eq!(registry.container("people").map(|c| c.push.clone()), Some(vec!["acf-field_authors".to_string()]));
}

#[test]
fn resolver_prefers_declared_bindings_over_classes() {
    let mut declared = widget("acf-field_a", "A", &["xtend-push-people"], Value::Null);
    declared.bindings = Some(ContainerBindings {
        excludes_from: Some("places".into()),
        ..Default::default()
    });

    let (index, registry, _host) = resolve(page(vec![declared]));

    let a = index.get("acf-field_a").expect("a");
    assert_eq!(a.bindings.container_for(Action::Push), None);
    assert_eq!(a.bindings.container_for(Action::Exclude), Some("places"));
    assert!(registry.container("people").is_none());
}

#[test]
fn resolver_ignores_a_second_container_for_the_same_action() {
    let mut snapshot = page(vec![widget(
        "acf-field_a",
        "A",
        &["xtend-push-people", "xtend-push-places"],
        Value::Null,
    )]);
    let mut index = field_containers::field::index::FieldIndex::build(&mut snapshot);
    let mut registry = ContainerRegistry::new();
    let tags = TagClasses::default();

    let summary = BindingResolver::new(&tags).initialize_all(&mut index.roots, &mut registry);

    assert_eq!(summary.bound_fields, 1);
    assert_eq!(summary.ignored_tags, 1);
    assert_eq!(registry.names(), vec!["people"]);
}

#[test]
fn get_reads_current_values_and_normalizes_scalars() {
    let (index, registry, mut host) = resolve(reservation_page());
    let lead = index.get("acf-field_lead").expect("lead");

    let values = registry.get(lead, &host);
    assert_eq!(values[&Action::Include]["people"], vec!["1", "2", "3"]);

    host.set_value("acf-field_authors", json!(5));
    let values = registry.get(lead, &host);
    assert_eq!(values[&Action::Include]["people"], vec!["5"]);
}

#[test]
fn get_skips_keys_the_host_cannot_resolve() {
    let (index, mut registry, host) = resolve(reservation_page());
    registry.set(&leaf("acf-field_gone", pushes("people")));

    let lead = index.get("acf-field_lead").expect("lead");
    let values = registry.get(lead, &host);

    assert_eq!(values[&Action::Include]["people"], vec!["1", "2", "3"]);
}

// =========================================================================
// Result filter
// =========================================================================

#[test]
fn unbound_field_passes_results_through() {
    let (index, registry, host) = resolve(reservation_page());
    let notes = index.get("acf-field_notes").expect("notes");

    let outcome = filter_list(abcd(), notes, &registry, &host, true);

    assert_eq!(outcome.applied, None);
    assert_eq!(outcome.results, abcd());
}

#[test]
fn push_hides_values_already_in_the_container() {
    let snapshot = page(vec![widget("acf-field_a", "A", &["xtend-push-x"], json!([1]))]);
    let (index, registry, host) = resolve(snapshot);
    let a = index.get("acf-field_a").expect("a");

    let raw = results(&[(1, "a"), (2, "b"), (3, "c")]);
    let outcome = filter_list(raw, a, &registry, &host, true);

    assert_eq!(outcome.applied, Some(Action::Push));
    assert_eq!(ids(&outcome.results), vec!["2", "3"]);
}

#[test]
fn push_without_duplicate_suppression_leaves_results_alone() {
    let snapshot = page(vec![widget("acf-field_a", "A", &["xtend-push-x"], json!([1]))]);
    let (index, registry, host) = resolve(snapshot);
    let a = index.get("acf-field_a").expect("a");

    let outcome = filter_list(abcd(), a, &registry, &host, false);

    assert_eq!(outcome.applied, None);
    assert_eq!(ids(&outcome.results), vec!["1", "2", "3", "4"]);
}

#[test]
fn exclude_removes_container_values_and_adds_nothing() {
    let snapshot = page(vec![
        widget("acf-field_src", "Source", &["xtend-push-x"], json!(["1", "2"])),
        widget("acf-field_e", "E", &["xtend-exclude-x"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let e = index.get("acf-field_e").expect("e");

    let outcome = filter_list(abcd(), e, &registry, &host, true);

    assert_eq!(outcome.applied, Some(Action::Exclude));
    assert_eq!(ids(&outcome.results), vec!["3", "4"]);
}

#[test]
fn exclude_field_also_hides_its_own_selection() {
    let snapshot = page(vec![widget("acf-field_e", "E", &["xtend-exclude-x"], json!([4]))]);
    let (index, registry, host) = resolve(snapshot);
    let e = index.get("acf-field_e").expect("e");

    let outcome = filter_list(abcd(), e, &registry, &host, true);
    assert_eq!(ids(&outcome.results), vec!["1", "2", "3"]);
}

#[test]
fn include_surfaces_each_value_once() {
    let snapshot = page(vec![
        widget("acf-field_p1", "P1", &["xtend-push-x"], json!([3])),
        widget("acf-field_p2", "P2", &["xtend-push-x"], json!([3])),
        widget("acf-field_i", "I", &["xtend-include-x"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let i = index.get("acf-field_i").expect("i");

    let outcome = filter_list(abcd(), i, &registry, &host, true);
    assert_eq!(outcome.applied, Some(Action::Include));
    assert_eq!(ids(&outcome.results), vec!["3"]);
    assert_eq!(outcome.results[0].text, "c");

    let outcome = filter_list(abcd(), i, &registry, &host, false);
    assert_eq!(ids(&outcome.results), vec!["3", "3"], "duplicates kept when suppression is off");
}

#[test]
fn include_follows_container_order_and_skips_missing_ids() {
    let snapshot = page(vec![
        widget("acf-field_p", "P", &["xtend-push-x"], json!([4, 9, 2])),
        widget("acf-field_i", "I", &["xtend-include-x"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let i = index.get("acf-field_i").expect("i");

    let outcome = filter_list(abcd(), i, &registry, &host, true);
    assert_eq!(ids(&outcome.results), vec!["4", "2"]);
}

#[test]
fn last_bound_action_overwrites_earlier_lists() {
    let mut both = widget("acf-field_f", "F", &["xtend-push-x", "xtend-include-y"], json!([1]));
    both.field_type = "post_object".into();
    let snapshot = page(vec![
        both,
        widget("acf-field_g", "G", &["xtend-push-y"], json!([1])),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let f = index.get("acf-field_f").expect("f");

    let raw = results(&[(1, "a"), (2, "b"), (3, "c")]);
    let outcome = filter_list(raw, f, &registry, &host, true);

    // push alone would give [2, 3]; the include list replaces it
    assert_eq!(outcome.applied, Some(Action::Include));
    assert_eq!(ids(&outcome.results), vec!["1"]);
    assert_eq!(outcome.results[0].text, "a");
}

#[test]
fn include_matching_nothing_keeps_the_push_list() {
    let snapshot = page(vec![
        widget("acf-field_f", "F", &["xtend-push-x", "xtend-include-y"], json!([1])),
        widget("acf-field_g", "G", &["xtend-push-y"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let f = index.get("acf-field_f").expect("f");

    let raw = results(&[(1, "a"), (2, "b"), (3, "c")]);
    let outcome = filter_list(raw, f, &registry, &host, true);

    assert_eq!(outcome.applied, Some(Action::Push));
    assert_eq!(ids(&outcome.results), vec!["2", "3"]);
}

#[test]
fn include_over_empty_container_passes_raw_through() {
    let snapshot = page(vec![widget("acf-field_i", "I", &["xtend-include-y"], Value::Null)]);
    let (index, registry, host) = resolve(snapshot);
    let i = index.get("acf-field_i").expect("i");

    let outcome = filter_list(abcd(), i, &registry, &host, true);

    assert_eq!(outcome.applied, None);
    assert_eq!(outcome.results, abcd());
}

#[test]
fn exclude_overwrites_the_include_list() {
    let snapshot = page(vec![
        widget(
            "acf-field_f",
            "F",
            &["xtend-push-x", "xtend-include-y", "xtend-exclude-z"],
            Value::Null,
        ),
        widget("acf-field_g", "G", &["xtend-push-y"], json!([2])),
        widget("acf-field_h", "H", &["xtend-push-z"], json!([2])),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let f = index.get("acf-field_f").expect("f");

    let raw = results(&[(1, "a"), (2, "b"), (3, "c")]);
    let outcome = filter_list(raw, f, &registry, &host, true);

    // include alone would give [2]
    assert_eq!(outcome.applied, Some(Action::Exclude));
    assert_eq!(ids(&outcome.results), vec!["1", "3"]);
}

#[test]
fn exclude_removing_everything_leaves_nothing() {
    let snapshot = page(vec![
        widget("acf-field_src", "Source", &["xtend-push-x"], json!([1, 2, 3, 4])),
        widget("acf-field_e", "E", &["xtend-exclude-x"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let e = index.get("acf-field_e").expect("e");

    let outcome = filter_list(abcd(), e, &registry, &host, true);

    assert_eq!(outcome.applied, Some(Action::Exclude));
    assert!(outcome.results.is_empty());
}

#[test]
fn non_numeric_values_never_match() {
    let snapshot = page(vec![
        widget("acf-field_p", "P", &["xtend-push-x"], json!(["abc", "2"])),
        widget("acf-field_e", "E", &["xtend-exclude-x"], Value::Null),
    ]);
    let (index, registry, host) = resolve(snapshot);
    let e = index.get("acf-field_e").expect("e");

    let mut raw = abcd();
    raw.push(field_containers::search::search_model::ResultEntry {
        id: json!("abc"),
        text: "textual".into(),
    });

    let outcome = filter_list(raw, e, &registry, &host, true);
    assert_eq!(ids(&outcome.results), vec!["1", "3", "4", "abc"]);
}

// =========================================================================
// Removal guard
// =========================================================================

#[test]
fn removal_blocked_while_an_include_field_uses_the_value() {
    let (index, _registry, host) = resolve(reservation_page());
    let authors = index.get("acf-field_authors").expect("authors");

    let decision = check_before_remove(authors, "2", "Bob", &index, &host);

    match decision {
        RemovalDecision::Deny { blockers, notice } => {
            assert_eq!(blockers.len(), 1);
            assert_eq!(blockers[0].key, "acf-field_lead");
            assert_eq!(blockers[0].label, "Lead author");
            assert_eq!(blockers[0].container, "people");
            assert_eq!(notice.kind, NoticeKind::Warning);
            assert!(notice.dismiss);
            assert!(notice.text().contains("\"Bob\""));
            assert!(notice.text().contains("Lead author"));
        }
        RemovalDecision::Allow => panic!("Expected removal of 2 to be denied"),
    }
}

#[test]
fn removal_allowed_without_conflict() {
    let (index, _registry, host) = resolve(reservation_page());
    let authors = index.get("acf-field_authors").expect("authors");

    assert!(check_before_remove(authors, "1", "Alice", &index, &host).is_allowed());
}

#[test]
fn removal_allowed_on_fields_that_do_not_push() {
    let (index, _registry, host) = resolve(reservation_page());
    let lead = index.get("acf-field_lead").expect("lead");

    assert!(check_before_remove(lead, "2", "", &index, &host).is_allowed());
}

#[test]
fn removal_notice_lists_every_blocking_field() {
    let snapshot = page(vec![
        widget("acf-field_authors", "Authors", &["xtend-push-people"], json!([1, 2])),
        widget("acf-field_lead", "Lead", &["xtend-include-people"], json!(2)),
        widget("acf-field_editor", "Editor", &["xtend-include-people"], json!(["2"])),
        widget("acf-field_other", "Other", &["xtend-include-places"], json!([2])),
    ]);
    let (index, _registry, host) = resolve(snapshot);
    let authors = index.get("acf-field_authors").expect("authors");

    let RemovalDecision::Deny { blockers, notice } = check_before_remove(authors, "2", "", &index, &host) else {
        panic!("Expected deny");
    };

    let labels: Vec<&str> = blockers.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Lead", "Editor"], "other containers are not consulted");
    assert_eq!(notice.lines.len(), 2);
    assert!(notice.lines[0].starts_with("\"2\""), "falls back to the id without text");
}

#[test]
fn removal_ignores_include_fields_missing_from_the_host() {
    let (index, _registry, mut host) = resolve(reservation_page());
    host.sync(&page(vec![]));
    let authors = index.get("acf-field_authors").expect("authors");

    assert!(host.field_value("acf-field_lead").is_none());
    assert!(check_before_remove(authors, "2", "", &index, &host).is_allowed());
}
