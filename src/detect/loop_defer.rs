//! Detection of `defer` statements placed directly in a loop body.
//!
//! A deferred call runs when the enclosing function returns, not at the
//! end of each iteration, so a `defer` in a loop body piles up one pending
//! call (and usually one open resource) per iteration.
//!
//! Only statements directly in the loop body are checked. A `defer`
//! nested inside an inner `if`, block, loop or function literal is not
//! reported by this loop; inner loops are checked on their own.

use tracing::trace;

use super::{Diagnostic, DiagnosticSink, Rule, RuleId};
use crate::tree::{direct_children, visit_all, SourceFile};

/// Message attached to every loop-defer diagnostic.
pub const LOOP_DEFER_MESSAGE: &str = "deferred-execution statement found inside a loop body";

/// Flags `defer` statements that are direct children of a loop body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopDeferRule;

impl Rule for LoopDeferRule {
    fn id(&self) -> RuleId {
        RuleId::LoopDefer
    }

    fn description(&self) -> &'static str {
        "defer statement directly inside a for or for-range body"
    }

    fn check(&self, file: &SourceFile, sink: &mut dyn DiagnosticSink) {
        visit_all(&file.root, |node| {
            if let Some(body) = node.body().filter(|_| node.is_loop()) {
                for stmt in direct_children(body).iter().filter(|s| s.is_defer()) {
                    trace!(at = %stmt.start, "defer in loop body");
                    sink.report(Diagnostic::new(
                        stmt.start.clone(),
                        LOOP_DEFER_MESSAGE,
                        self.id(),
                    ));
                }
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Collector;
    use crate::parser::{GoParser, SourceParser};

    fn check(source: &str) -> Vec<Diagnostic> {
        let file = GoParser::new()
            .unwrap()
            .parse(source.as_bytes(), "loop.go")
            .unwrap();
        let mut sink = Collector::new();
        LoopDeferRule.check(&file, &mut sink);
        sink.into_diagnostics()
    }

    #[test]
    fn test_defer_in_counted_loop() {
        let source = r#"
package main

func run(n int) {
    for i := 0; i < n; i++ {
        releaseResource()
        defer deferredCleanup()
    }
}
"#;
        let diags = check(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].position.offset, source.find("defer").unwrap());
        assert_eq!(diags[0].position.line, 7);
        assert_eq!(diags[0].position.column, 9);
        assert_eq!(diags[0].message, LOOP_DEFER_MESSAGE);
        assert_eq!(diags[0].rule, RuleId::LoopDefer);
    }

    #[test]
    fn test_defer_in_range_loop() {
        let diags = check(
            r#"
package main

func closeAll(files []*os.File) {
    for _, f := range files {
        defer f.Close()
    }
}
"#,
        );
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_defer_in_condition_and_infinite_loops() {
        let diags = check(
            r#"
package main

func poll(ok func() bool) {
    for ok() {
        defer a()
    }
    for {
        defer b()
        break
    }
}
"#,
        );
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_nested_in_if_is_not_reported() {
        let diags = check(
            r#"
package main

func run(n int) {
    for i := 0; i < n; i++ {
        releaseResource()
        if i > 0 {
            defer deferredCleanup()
        }
    }
}
"#,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_nested_in_bare_block_and_closure_not_reported() {
        let diags = check(
            r#"
package main

func run(xs []int) {
    for range xs {
        {
            defer a()
        }
        func() {
            defer b()
        }()
    }
}
"#,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_inner_loop_reported_once() {
        let source = r#"
package main

func grid(n int) {
    for i := 0; i < n; i++ {
        for j := 0; j < n; j++ {
            defer inner()
        }
    }
}
"#;
        let diags = check(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].position.offset, source.find("defer").unwrap());
    }

    #[test]
    fn test_defer_outside_loop_not_reported() {
        let diags = check(
            r#"
package main

func open() {
    defer cleanup()
    for i := 0; i < 3; i++ {
        work(i)
    }
}
"#,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_source_order_across_and_within_loops() {
        let source = r#"
package main

func many(xs []int) {
    for range xs {
        defer first()
        defer second()
    }
    for range xs {
        defer third()
    }
}
"#;
        let diags = check(source);
        let offsets: Vec<_> = diags.iter().map(|d| d.position.offset).collect();
        assert_eq!(
            offsets,
            vec![
                source.find("defer first").unwrap(),
                source.find("defer second").unwrap(),
                source.find("defer third").unwrap(),
            ]
        );
    }

    #[test]
    fn test_diagnostics_fall_inside_defer_statements() {
        let source = r#"
package main

func drain(ch chan int, xs []int) {
    for v := range ch {
        if v > 0 {
            defer skipped()
        }
        defer flush(v)
    }
    for {
        defer again()
    }
}
"#;
        let file = GoParser::new()
            .unwrap()
            .parse(source.as_bytes(), "loop.go")
            .unwrap();
        let mut sink = Collector::new();
        LoopDeferRule.check(&file, &mut sink);
        let diags = sink.into_diagnostics();
        assert_eq!(diags.len(), 2);

        let mut defers = Vec::new();
        visit_all(&file.root, |node| {
            if node.is_defer() {
                defers.push(node);
            }
            true
        });
        for diag in &diags {
            assert!(defers.iter().any(|d| d.contains(&diag.position)));
        }
    }

    #[test]
    fn test_no_loops_no_diagnostics() {
        assert!(check("package main\n\nfunc main() {}\n").is_empty());
    }
}
