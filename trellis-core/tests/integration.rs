//! Integration Tests for Workflow Graphs
//!
//! These tests build graphs through the public API, activate them and verify
//! the reports and contexts that computations produce.

use serde_json::json;

use trellis_core::nodes::{action, decision};
use trellis_core::{
    ComputeError, ComputeState, ComputeValue, Computation, Context, GraphError, JoinMode, Node,
    NodeRef, NodeSystem, ValidationError,
};

/// Node that stores `true` under its own name.
fn writer(key: &'static str) -> NodeRef {
    action(key, move |ctx| {
        ctx.store(key, true);
        Ok(())
    })
}

fn always(name: &'static str, answer: bool) -> NodeRef {
    decision(name, move |_| Ok(answer))
}

fn system_of(nodes: &[&NodeRef]) -> NodeSystem {
    let mut system = NodeSystem::new();
    for node in nodes {
        system.add_node((*node).clone()).unwrap();
    }
    system
}

type Outcome = (Result<(), ComputeError>, bool, Vec<(NodeRef, ComputeState)>);

fn run(system: &NodeSystem, context: &mut Context) -> Outcome {
    let mut computation = Computation::new(system, context).unwrap();
    let result = computation.compute();
    let status = computation.status();
    let report = computation
        .report()
        .iter()
        .map(|(node, state)| (node.clone(), state.clone()))
        .collect();
    (result, status, report)
}

#[test]
fn empty_system_computes_nothing() {
    let mut system = NodeSystem::new();
    system.activate().unwrap();

    let mut context = Context::new();
    context.store("untouched", 1);
    let (result, status, report) = run(&system, &mut context);

    assert!(result.is_ok());
    assert!(status);
    assert!(report.is_empty());
    assert_eq!(serde_json::to_value(&context).unwrap(), json!({ "untouched": 1 }));
}

#[test]
fn single_action_writes_context() {
    let a = action("a", |ctx| {
        ctx.store("k", "v");
        Ok(())
    });
    let mut system = system_of(&[&a]);
    system.activate().unwrap();

    let mut context = Context::new();
    let (result, status, report) = run(&system, &mut context);

    assert!(result.is_ok());
    assert!(status);
    assert_eq!(report, vec![(a, ComputeState::proceed())]);
    assert_eq!(serde_json::to_value(&context).unwrap(), json!({ "k": "v" }));
}

#[test]
fn decision_follows_true_branch() {
    let d = always("d", true);
    let x = writer("x");
    let y = writer("y");
    let mut system = system_of(&[&d, &x, &y]);
    system.add_link_on_branch(&d, &x, true).unwrap();
    system.add_link_on_branch(&d, &y, false).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let mut computation = Computation::new(&system, &mut context).unwrap();
    computation.compute().unwrap();

    let report = computation.report();
    assert_eq!(report.len(), 3);
    assert_eq!(report.get(&d), Some(&ComputeState::continue_on_branch(true)));
    assert_eq!(report.get(&x), Some(&ComputeState::proceed()));
    assert_eq!(report.get(&y), Some(&ComputeState::skip()));
    assert!(computation.context().have_key("x"));
    assert!(!computation.context().have_key("y"));
}

#[test]
fn and_join_runs_when_all_writers_continue() {
    let w1 = writer("w1");
    let w2 = writer("w2");
    let r = writer("r");
    let mut system = system_of(&[&w1, &w2, &r]);
    system.add_link(&w1, &r).unwrap();
    system.add_link(&w2, &r).unwrap();
    system.configure_join_mode_on_node(&r, JoinMode::And).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let (result, status, report) = run(&system, &mut context);

    assert!(result.is_ok());
    assert!(status);
    assert_eq!(
        report,
        vec![
            (w1, ComputeState::proceed()),
            (w2, ComputeState::proceed()),
            (r, ComputeState::proceed()),
        ]
    );
}

/// `gate` decides `answer` and feeds `target` on its true branch; `plain`
/// always continues into `target`. The target is evaluated once both are known.
fn gated_join(answer: bool, mode: JoinMode) -> ComputeValue {
    let gate = always("gate", answer);
    let sink = writer("sink");
    let plain = writer("plain");
    let target = writer("target");

    let mut system = system_of(&[&gate, &plain, &sink, &target]);
    system.add_link_on_branch(&gate, &target, true).unwrap();
    system.add_link_on_branch(&gate, &sink, false).unwrap();
    system.add_link(&plain, &target).unwrap();
    system.configure_join_mode_on_node(&target, mode).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let mut computation = Computation::new(&system, &mut context).unwrap();
    computation.compute().unwrap();
    computation.state_of(&target).unwrap().value()
}

/// Both ancestors of `target` are known and neither continues into it:
/// `gate` decides false, `skipped` is skipped by its own exactly-one join.
fn starved_join(mode: JoinMode) -> ComputeValue {
    let gate = always("gate", false);
    let sink = writer("sink");
    let p1 = writer("p1");
    let p2 = writer("p2");
    let skipped = writer("skipped");
    let target = writer("target");

    let mut system = system_of(&[&gate, &sink, &p1, &p2, &skipped, &target]);
    system.add_link_on_branch(&gate, &target, true).unwrap();
    system.add_link_on_branch(&gate, &sink, false).unwrap();
    system.add_link(&p1, &skipped).unwrap();
    system.add_link(&p2, &skipped).unwrap();
    system.add_link(&skipped, &target).unwrap();
    system.configure_join_mode_on_node(&target, mode).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let mut computation = Computation::new(&system, &mut context).unwrap();
    computation.compute().unwrap();
    assert_eq!(computation.state_of(&skipped), Some(&ComputeState::skip()));
    computation.state_of(&target).unwrap().value()
}

#[test]
fn and_join_needs_every_ancestor() {
    assert_eq!(gated_join(true, JoinMode::And), ComputeValue::Continue);
    assert_eq!(gated_join(false, JoinMode::And), ComputeValue::Skip);
    assert_eq!(starved_join(JoinMode::And), ComputeValue::Skip);
}

#[test]
fn or_join_needs_any_ancestor() {
    assert_eq!(gated_join(true, JoinMode::Or), ComputeValue::Continue);
    assert_eq!(gated_join(false, JoinMode::Or), ComputeValue::Continue);
    assert_eq!(starved_join(JoinMode::Or), ComputeValue::Skip);
}

#[test]
fn none_join_needs_exactly_one_ancestor() {
    assert_eq!(gated_join(true, JoinMode::None), ComputeValue::Skip);
    assert_eq!(gated_join(false, JoinMode::None), ComputeValue::Continue);
    assert_eq!(starved_join(JoinMode::None), ComputeValue::Skip);
}

#[test]
fn none_join_merges_both_branches_of_a_decision() {
    for answer in [true, false] {
        let d = always("d", answer);
        let merge = writer("merge");
        let mut system = system_of(&[&d, &merge]);
        system.add_link_on_branch(&d, &merge, true).unwrap();
        system.add_link_on_branch(&d, &merge, false).unwrap();
        system.activate().unwrap();

        let mut context = Context::new();
        let mut computation = Computation::new(&system, &mut context).unwrap();
        computation.compute().unwrap();

        assert_eq!(computation.state_of(&merge), Some(&ComputeState::proceed()));
    }
}

/// `d` decides `answer`; `yes` and `no` hang off its two branches and both
/// feed `merge`. Returns the report and whether `merge` wrote the context.
fn if_else_merge(answer: bool, mode: JoinMode) -> (Vec<(NodeRef, ComputeState)>, bool) {
    let d = always("d", answer);
    let yes = writer("yes");
    let no = writer("no");
    let merge = writer("merge");
    let mut system = system_of(&[&d, &yes, &no, &merge]);
    system.add_link_on_branch(&d, &yes, true).unwrap();
    system.add_link_on_branch(&d, &no, false).unwrap();
    system.add_link(&yes, &merge).unwrap();
    system.add_link(&no, &merge).unwrap();
    system.configure_join_mode_on_node(&merge, mode).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let (result, status, report) = run(&system, &mut context);
    result.unwrap();
    assert!(status);
    (report, context.have_key("merge"))
}

#[test]
fn join_below_an_if_else_resolves() {
    let (report, merged) = if_else_merge(true, JoinMode::None);
    let states: Vec<_> = report.iter().map(|(node, state)| (node.name(), state.clone())).collect();
    assert_eq!(
        states,
        vec![
            ("d", ComputeState::continue_on_branch(true)),
            ("yes", ComputeState::proceed()),
            ("no", ComputeState::skip()),
            ("merge", ComputeState::proceed()),
        ]
    );
    assert!(merged);

    for answer in [true, false] {
        assert!(if_else_merge(answer, JoinMode::Or).1);
        assert!(if_else_merge(answer, JoinMode::None).1);
        assert!(!if_else_merge(answer, JoinMode::And).1);
    }
}

#[test]
fn abort_halts_with_node_error() {
    let w = writer("w");
    let e = action("e", |_| Err("boom".into()));
    let after = writer("after");
    let mut system = system_of(&[&w, &e, &after]);
    system.add_link(&w, &e).unwrap();
    system.add_link(&e, &after).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let (result, status, report) = run(&system, &mut context);

    let error = result.unwrap_err();
    assert_eq!(error.to_string(), "boom");
    assert!(matches!(&error, ComputeError::Aborted { node, .. } if *node == e.id()));
    assert!(!status);
    assert_eq!(
        report,
        vec![
            (w, ComputeState::proceed()),
            (e, ComputeState::abort("boom")),
        ]
    );
    assert!(context.have_key("w"));
    assert!(!context.have_key("after"));
}

#[test]
fn repeated_runs_are_deterministic() {
    let order = |label: &'static str| {
        action(label, move |ctx| {
            let mut seen: Vec<String> = ctx.read_as("order").transpose()?.unwrap_or_default();
            seen.push(label.to_string());
            ctx.store_serialized("order", &seen)?;
            Ok(())
        })
    };
    let d = decision("d", |ctx| Ok(ctx.read_as::<i64>("amount").transpose()?.unwrap_or(0) > 100));
    let big = order("big");
    let small = order("small");
    let audit = order("audit");
    let done = order("done");

    let mut system = system_of(&[&d, &big, &small, &audit, &done]);
    system.add_link_on_branch(&d, &big, true).unwrap();
    system.add_link_on_branch(&d, &small, false).unwrap();
    system.add_link(&big, &done).unwrap();
    system.add_link(&audit, &done).unwrap();
    system.configure_join_mode_on_node(&done, JoinMode::Or).unwrap();
    system.activate().unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        let mut context: Context = serde_json::from_value(json!({ "amount": 250 })).unwrap();
        let (result, status, report) = run(&system, &mut context);
        result.unwrap();
        assert!(status);
        outcomes.push((report, context));
    }

    assert_eq!(outcomes[0], outcomes[1]);
    assert_eq!(outcomes[1], outcomes[2]);
    assert_eq!(
        outcomes[0].1.read("order"),
        Some(&json!(["big", "audit", "done"]))
    );
}

#[test]
fn cycles_fail_validation_with_their_links() {
    let a = writer("a");
    let b = writer("b");
    let c = writer("c");
    let mut system = system_of(&[&a, &b, &c]);
    system.add_link(&a, &b).unwrap();
    system.add_link(&b, &c).unwrap();
    system.add_link(&c, &b).unwrap();

    let errors = system.is_valid().unwrap_err();
    let cycle: Vec<_> = match errors.iter().next() {
        Some(ValidationError::Cycle { links }) => links
            .iter()
            .map(|link| (link.from().clone(), link.to().clone()))
            .collect(),
        other => panic!("expected a cycle, got {other:?}"),
    };
    assert_eq!(cycle, vec![(b.clone(), c.clone()), (c, b)]);
    assert!(errors.to_string().starts_with("cycle detected: "));

    assert!(matches!(system.activate(), Err(GraphError::NotValidated(_))));
    assert!(!system.is_activated());
}

#[test]
fn orphan_decision_fails_validation() {
    let d = always("d", true);
    let system = system_of(&[&d]);

    let errors = system.is_valid().unwrap_err().into_vec();
    assert_eq!(errors, vec![ValidationError::OrphanDecision { node: d }]);
}

#[test]
fn validation_collects_every_problem() {
    let d = always("d", true);
    let a = writer("a");
    let ghost = writer("ghost");
    let mut system = system_of(&[&d, &a, &a]);
    system.add_link(&a, &ghost).unwrap();

    let errors = system.is_valid().unwrap_err();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.to_string().lines().count(), 3);
}

#[test]
fn reactivation_is_a_noop() {
    let a = writer("a");
    let mut system = system_of(&[&a]);
    system.activate().unwrap();
    system.activate().unwrap();
    assert_eq!(system.initial_nodes(), &[a]);
}

#[test]
fn one_system_serves_many_threads() {
    let d = decision("d", |ctx| Ok(ctx.read_as::<bool>("flag").transpose()?.unwrap_or(false)));
    let yes = writer("yes");
    let no = writer("no");
    let mut system = system_of(&[&d, &yes, &no]);
    system.add_link_on_branch(&d, &yes, true).unwrap();
    system.add_link_on_branch(&d, &no, false).unwrap();
    system.activate().unwrap();
    let system = std::sync::Arc::new(system);

    let handles: Vec<_> = [true, false, true, false]
        .into_iter()
        .map(|flag| {
            let system = system.clone();
            std::thread::spawn(move || {
                let mut context = Context::new();
                context.store("flag", flag);
                let mut computation = Computation::new(&system, &mut context).unwrap();
                computation.compute().unwrap();
                drop(computation);
                (flag, context.have_key("yes"), context.have_key("no"))
            })
        })
        .collect();

    for handle in handles {
        let (flag, yes, no) = handle.join().unwrap();
        assert_eq!(yes, flag);
        assert_eq!(no, !flag);
    }
}

/// A custom node type, used without the reference wrappers.
struct Threshold {
    key: &'static str,
    limit: i64,
}

impl Node for Threshold {
    fn compute(&self, context: &mut Context) -> ComputeState {
        match context.read_as::<i64>(self.key) {
            Some(Ok(value)) => ComputeState::continue_on_branch(value >= self.limit),
            Some(Err(error)) => ComputeState::abort(error),
            None => ComputeState::continue_on_branch(false),
        }
    }

    fn decide_capability(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

#[test]
fn custom_nodes_plug_in() {
    let gate = NodeRef::new(Threshold { key: "score", limit: 50 });
    let pass = writer("pass");
    let fail = writer("fail");
    let mut system = system_of(&[&gate, &pass, &fail]);
    system.add_link_on_branch(&gate, &pass, true).unwrap();
    system.add_link_on_branch(&gate, &fail, false).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    context.store("score", 10);
    let mut computation = Computation::new(&system, &mut context).unwrap();
    computation.compute().unwrap();
    assert!(computation.context().have_key("fail"));

    let mut context = Context::new();
    context.store("score", "high");
    let mut computation = Computation::new(&system, &mut context).unwrap();
    let error = computation.compute().unwrap_err();
    assert!(error.to_string().contains("invalid type"));
    assert_eq!(computation.report().len(), 1);
}

#[test]
fn report_serializes_for_diagnostics() {
    let d = always("route", false);
    let x = writer("x");
    let y = writer("y");
    let mut system = system_of(&[&d, &x, &y]);
    system.add_link_on_branch(&d, &x, true).unwrap();
    system.add_link_on_branch(&d, &y, false).unwrap();
    system.activate().unwrap();

    let mut context = Context::new();
    let mut computation = Computation::new(&system, &mut context).unwrap();
    computation.compute().unwrap();
    let report = computation.into_report();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json[format!("route#{}", d.id()).as_str()],
        json!({ "value": "continue", "branch": false, "error": null })
    );
    assert_eq!(json[format!("y#{}", y.id()).as_str()]["value"], json!("continue"));
    assert_eq!(json[format!("x#{}", x.id()).as_str()]["value"], json!("skip"));
}
