use std::collections::BTreeMap;
use std::fmt::{self, Write};

use thiserror::Error;
use tickprof_protocol::SharedStr;

use super::comment::CommentSource;
use super::counters::{CounterNode, build_counter_trees};
use super::timings::TimingKind;
use crate::config::ReportConfig;
use crate::model::{LocationPath, ProfileResult};

pub const PROFILE_DUMP_BEGIN: &str = "--- BEGIN PROFILE DUMP ---";
pub const PROFILE_DUMP_END: &str = "--- END PROFILE DUMP ---";
pub const COUNTER_DUMP_BEGIN: &str = "--- BEGIN COUNTER DUMP ---";
pub const COUNTER_DUMP_END: &str = "--- END COUNTER DUMP ---";

const BANNER: &str = "---- Tick Profiler Results ----";

/// Failure while rendering one timing subtree.
#[derive(Debug, Error)]
pub enum SubtreeError {
    #[error("subtree at depth {depth} exceeds the depth limit of {limit}")]
    TooDeep { depth: usize, limit: usize },
    #[error("report writer failed")]
    Format(#[from] fmt::Error),
}

/// Renders the text report for a [`ProfileResult`].
///
/// ```text
///   ---- banner, comment, version, spans ----
///   --- BEGIN PROFILE DUMP ---     nested timing tree from `root`
///   --- END PROFILE DUMP ---
///   --- BEGIN COUNTER DUMP ---     one tree per counter name (only if any)
///   --- END COUNTER DUMP ---
/// ```
///
/// A subtree that fails to render is replaced by an `[[ EXCEPTION .. ]]`
/// line and the rest of the report carries on.
pub struct ReportRenderer<'a> {
    result: &'a ProfileResult,
    config: &'a ReportConfig,
    comments: &'a dyn CommentSource,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(
        result: &'a ProfileResult,
        config: &'a ReportConfig,
        comments: &'a dyn CommentSource,
    ) -> Self {
        Self {
            result,
            config,
            comments,
        }
    }

    /// The complete report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Err(err) = self.write_report(&mut out) {
            tracing::error!(error = %err, "failed to render profiler report");
        }
        out
    }

    /// Only the timing tree below `root`, without banner or markers.
    pub fn render_root_timings(&self) -> String {
        let mut out = String::new();
        if let Err(err) = self.append_isolated(0, &LocationPath::root(), &mut out) {
            tracing::error!(error = %err, "failed to render root timings");
        }
        out
    }

    pub fn write_report<W: Write>(&self, out: &mut W) -> fmt::Result {
        let time_span = self.result.time_span();
        let tick_span = self.result.tick_span();
        tracing::debug!(
            locations = self.result.store().len(),
            time_span,
            tick_span,
            "rendering profiler report"
        );

        writeln!(out, "{BANNER}")?;
        writeln!(out, "// {}", self.comments.comment())?;
        writeln!(out)?;
        writeln!(out, "Version: {}", self.config.build_mode)?;
        writeln!(out, "Time span: {} ms", time_span / 1_000_000)?;
        writeln!(out, "Tick span: {tick_span} ticks")?;
        writeln!(
            out,
            "// This is approximately {:.2} ticks per second. It should be {} ticks per second",
            round_half_up(ticks_per_second(tick_span, time_span), 2),
            self.config.tick_rate
        )?;
        writeln!(out)?;

        writeln!(out, "{PROFILE_DUMP_BEGIN}")?;
        writeln!(out)?;
        self.append_isolated(0, &LocationPath::root(), out)?;
        writeln!(out, "{PROFILE_DUMP_END}")?;
        writeln!(out)?;

        if self.result.store().has_counters() {
            let counters = build_counter_trees(self.result.store());
            writeln!(out, "{COUNTER_DUMP_BEGIN}")?;
            writeln!(out)?;
            self.append_counter_dump(&counters, out)?;
            writeln!(out, "{COUNTER_DUMP_END}")?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Render one subtree, replacing it with a marker line if it fails.
    /// Only a broken writer is passed up.
    fn append_isolated<W: Write>(
        &self,
        depth: usize,
        path: &LocationPath,
        out: &mut W,
    ) -> fmt::Result {
        match self.append_timing(depth, path, out) {
            Ok(()) => Ok(()),
            Err(SubtreeError::Format(err)) => Err(err),
            Err(err) => {
                tracing::warn!(
                    path = %path.join('/'),
                    error = %err,
                    "skipping degraded profiler subtree"
                );
                indent(out, depth)?;
                writeln!(out, "[[ EXCEPTION {err} ]]")
            }
        }
    }

    fn append_timing<W: Write>(
        &self,
        depth: usize,
        path: &LocationPath,
        out: &mut W,
    ) -> Result<(), SubtreeError> {
        let tick_span = self.result.tick_span();
        let info = self.result.store().get(path);
        let rows = self.result.timings(path, self.config.separator);

        // A node with at most one child row is not expanded.
        let expands = rows.len() >= 3;
        if info.counters.is_empty() && !expands {
            return Ok(());
        }
        if depth > self.config.max_depth {
            return Err(SubtreeError::TooDeep {
                depth,
                limit: self.config.max_depth,
            });
        }

        for (name, &value) in &info.counters {
            indent(out, depth)?;
            writeln!(out, "#{name} {value}/{}", per_tick(value, tick_span))?;
        }
        if !expands {
            return Ok(());
        }

        for row in &rows[1..] {
            indent(out, depth)?;
            writeln!(
                out,
                "{}({}/{:.0}) - {:.2}%/{:.2}%",
                row.name,
                row.visit_count,
                round_half_up(visits_per_tick(row.visit_count, tick_span), 0),
                round_half_up(row.parent_section_usage_percentage, 2),
                round_half_up(row.total_usage_percentage, 2)
            )?;
            if row.kind == TimingKind::Location {
                self.append_isolated(depth + 1, &path.child(row.name.clone()), out)?;
            }
        }
        Ok(())
    }

    fn append_counter_dump<W: Write>(
        &self,
        counters: &BTreeMap<SharedStr, CounterNode>,
        out: &mut W,
    ) -> fmt::Result {
        for (name, tree) in counters {
            writeln!(out, "-- Counter: {name} --")?;
            for (segment, node) in tree.children_by_total() {
                self.append_counter(0, segment, node, out)?;
            }
            writeln!(out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn append_counter<W: Write>(
        &self,
        depth: usize,
        name: &str,
        node: &CounterNode,
        out: &mut W,
    ) -> fmt::Result {
        let tick_span = self.result.tick_span();
        indent(out, depth)?;
        if depth > self.config.max_depth {
            let err = SubtreeError::TooDeep {
                depth,
                limit: self.config.max_depth,
            };
            return writeln!(out, "[[ EXCEPTION {err} ]]");
        }
        writeln!(
            out,
            "{name} total:{}/{} average: {}/{}",
            node.self_value,
            node.total_value,
            per_tick(node.self_value, tick_span),
            per_tick(node.total_value, tick_span)
        )?;
        for (child_name, child) in node.children_by_total() {
            self.append_counter(depth + 1, child_name, child, out)?;
        }
        Ok(())
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    write!(out, "[{depth:02}] ")?;
    for _ in 0..depth {
        out.write_str("|   ")?;
    }
    Ok(())
}

/// Integer average per tick; zero when no ticks elapsed.
fn per_tick(value: u64, tick_span: u64) -> u64 {
    value.checked_div(tick_span).unwrap_or(0)
}

fn visits_per_tick(visits: u64, tick_span: u64) -> f64 {
    if tick_span == 0 {
        0.0
    } else {
        visits as f64 / tick_span as f64
    }
}

/// Round to `places` decimals with ties away from zero. The formatter alone
/// rounds ties to even, which would print `2` for 2.5 visits per tick.
fn round_half_up(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

fn ticks_per_second(tick_span: u64, time_span_ns: u64) -> f64 {
    if time_span_ns == 0 {
        0.0
    } else {
        tick_span as f64 / (time_span_ns as f64 / 1e9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LocationInfo, SampleStore};
    use crate::views::comment::FixedComment;
    use tickprof_protocol::RunWindow;

    fn config() -> ReportConfig {
        ReportConfig {
            separator: '.',
            ..ReportConfig::default()
        }
    }

    fn result(samples: Vec<(&str, LocationInfo)>, window: RunWindow) -> ProfileResult {
        let store: SampleStore = samples
            .into_iter()
            .map(|(p, info)| (LocationPath::parse(p, '.'), info))
            .collect();
        ProfileResult::new(store, window).unwrap()
    }

    fn server_tick() -> ProfileResult {
        result(
            vec![
                ("root", LocationInfo::new(1000, 20)),
                ("root.tick", LocationInfo::new(600, 20)),
                ("root.tick.entities", LocationInfo::new(400, 40)),
                ("root.tick.blocks", LocationInfo::new(100, 20)),
                (
                    "root.save",
                    LocationInfo::new(200, 1).with_counter("bytes", 4000),
                ),
            ],
            RunWindow::new(0, 1_000_000_000, 0, 20),
        )
    }

    #[test]
    fn renders_full_report() {
        let result = server_tick();
        let config = config();
        let comment = FixedComment::new("fixed");
        let report = ReportRenderer::new(&result, &config, &comment).render();

        let expected = concat!(
            "---- Tick Profiler Results ----\n",
            "// fixed\n",
            "\n",
            "Version: production\n",
            "Time span: 1000 ms\n",
            "Tick span: 20 ticks\n",
            "// This is approximately 20.00 ticks per second. It should be 20 ticks per second\n",
            "\n",
            "--- BEGIN PROFILE DUMP ---\n",
            "\n",
            "[00] tick(20/1) - 60.00%/60.00%\n",
            "[01] |   entities(40/2) - 66.67%/40.00%\n",
            "[01] |   blocks(20/1) - 16.67%/10.00%\n",
            "[01] |   unspecified(20/1) - 16.67%/10.00%\n",
            "[00] save(1/0) - 20.00%/20.00%\n",
            "[01] |   #bytes 4000/200\n",
            "[00] unspecified(20/1) - 20.00%/20.00%\n",
            "--- END PROFILE DUMP ---\n",
            "\n",
            "--- BEGIN COUNTER DUMP ---\n",
            "\n",
            "-- Counter: bytes --\n",
            "[00] root total:0/4000 average: 0/200\n",
            "[01] |   save total:4000/4000 average: 200/200\n",
            "\n",
            "\n",
            "--- END COUNTER DUMP ---\n",
            "\n",
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn no_counter_section_without_counters() {
        let result = result(
            vec![
                ("root", LocationInfo::new(10, 1)),
                ("root.a", LocationInfo::new(5, 1)),
            ],
            RunWindow::new(0, 1_000_000, 0, 1),
        );
        let config = config();
        let comment = FixedComment::new("x");
        let report = ReportRenderer::new(&result, &config, &comment).render();
        assert!(report.contains(PROFILE_DUMP_END));
        assert!(!report.contains(COUNTER_DUMP_BEGIN));
        // root has one child plus unspecified, so it expands.
        assert!(report.contains("[00] a(1/1) - 50.00%/50.00%\n"));
    }

    #[test]
    fn single_child_is_not_expanded() {
        let result = result(
            vec![
                ("root", LocationInfo::new(10, 1)),
                ("root.a", LocationInfo::new(10, 1)),
            ],
            RunWindow::new(0, 1_000_000, 0, 1),
        );
        let config = config();
        let comment = FixedComment::new("x");
        let timings = ReportRenderer::new(&result, &config, &comment).render_root_timings();
        assert_eq!(timings, "");
    }

    #[test]
    fn zero_spans_do_not_divide_by_zero() {
        let result = result(
            vec![
                ("root", LocationInfo::new(0, 0).with_counter("c", 9)),
                ("root.a", LocationInfo::new(0, 3)),
                ("root.b", LocationInfo::new(0, 3)),
            ],
            RunWindow::new(5, 5, 7, 7),
        );
        let config = ReportConfig {
            build_mode: crate::config::BuildMode::Dev,
            ..config()
        };
        let comment = FixedComment::new("x");
        let report = ReportRenderer::new(&result, &config, &comment).render();
        assert!(report.contains("Version: dev\n"));
        assert!(report.contains("Time span: 0 ms\n"));
        assert!(report.contains("approximately 0.00 ticks per second"));
        assert!(report.contains("[00] #c 9/0\n"));
        assert!(report.contains("[00] a(3/0) - 0.00%/0.00%\n"));
        assert!(report.contains("[00] root total:9/9 average: 0/0\n"));
    }

    #[test]
    fn degraded_subtree_is_isolated() {
        let result = result(
            vec![
                ("root", LocationInfo::new(100, 1)),
                ("root.a", LocationInfo::new(50, 1)),
                ("root.a.x", LocationInfo::new(20, 1)),
                ("root.a.x.y", LocationInfo::new(10, 1)),
                ("root.a.x.z", LocationInfo::new(5, 1)),
                ("root.b", LocationInfo::new(30, 1)),
            ],
            RunWindow::new(0, 1_000_000_000, 0, 1),
        );
        let config = ReportConfig {
            max_depth: 1,
            ..config()
        };
        let comment = FixedComment::new("x");
        let timings = ReportRenderer::new(&result, &config, &comment).render_root_timings();

        let expected = concat!(
            "[00] a(1/1) - 50.00%/50.00%\n",
            "[01] |   unspecified(1/1) - 60.00%/30.00%\n",
            "[01] |   x(1/1) - 40.00%/20.00%\n",
            "[02] |   |   [[ EXCEPTION subtree at depth 2 exceeds the depth limit of 1 ]]\n",
            "[00] b(1/1) - 30.00%/30.00%\n",
            "[00] unspecified(1/1) - 20.00%/20.00%\n",
        );
        assert_eq!(timings, expected);
    }

    #[test]
    fn child_named_unspecified_is_still_expanded() {
        let result = result(
            vec![
                ("root", LocationInfo::new(100, 1)),
                ("root.unspecified", LocationInfo::new(60, 1)),
                ("root.unspecified.io", LocationInfo::new(10, 1)),
            ],
            RunWindow::new(0, 1_000_000_000, 0, 1),
        );
        let config = config();
        let comment = FixedComment::new("x");
        let timings = ReportRenderer::new(&result, &config, &comment).render_root_timings();
        assert!(timings.contains("[01] |   io(1/1) - 16.67%/10.00%\n"));
    }

    #[test]
    fn ties_round_away_from_zero() {
        let result = result(
            vec![
                ("root", LocationInfo::new(800, 1)),
                ("root.a", LocationInfo::new(97, 1)),
                ("root.b", LocationInfo::new(100, 5)),
            ],
            RunWindow::new(0, 1_000_000_000, 0, 2),
        );
        let config = config();
        let comment = FixedComment::new("x");
        let timings = ReportRenderer::new(&result, &config, &comment).render_root_timings();
        // 5/2 = 2.5 and 1/2 = 0.5 visits per tick, 97/800 = 12.125%.
        assert!(timings.contains("[00] b(5/3) - 12.50%/12.50%\n"), "{timings}");
        assert!(timings.contains("[00] a(1/1) - 12.13%/12.13%\n"), "{timings}");
    }

    #[test]
    fn round_half_up_helper() {
        assert_eq!(round_half_up(0.5, 0), 1.0);
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(12.125, 2), 12.13);
        assert_eq!(round_half_up(0.04, 0), 0.0);
    }

    #[test]
    fn concurrent_renders_agree() {
        let result = server_tick();
        let config = config();
        let comment = FixedComment::new("same");
        let renderer = ReportRenderer::new(&result, &config, &comment);
        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| renderer.render());
            let b = s.spawn(|| renderer.render());
            (a.join().unwrap(), b.join().unwrap())
        });
        assert_eq!(a, b);
    }
}
