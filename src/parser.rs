//! Plan text parser
//!
//! Generated plans are markdown-ish text with inconsistent formatting. Parsing
//! is line-oriented: each line is classified on its own by `classify_line`,
//! and the only state carried between lines is the currently open week.

use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::models::day::parse_day_name;
use crate::models::{
  Diagnostic, DiagnosticKind, PaceSet, ParsedWeek, ParsedWorkout, RunnerProfile, WorkoutKind,
  WorkoutReference, WorkoutType,
};
use crate::paces::PaceTable;

/// ---------------------------------------------------------------------------
/// Patterns
/// ---------------------------------------------------------------------------

static WEEK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^[\s#*_>•\-]*week\s+(\d+)\b").expect("week header pattern")
});

/// Group 2 marks a bare lowercase `k`; group 3 marks it as a race name ("5k race")
static DISTANCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(\d+(?:\.\d+)?)",
    r"(?:\s*(?i:miles?|mi|kilometers?|kilometres?|kms?)\b",
    r"|(k)\b(\s*(?i:race|pace|effort|goal|time|tune-?up)\b)?)",
  ))
  .expect("distance pattern")
});

static DAY_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(?i)^[\s#*_>•+\-]*(?:\d+[.)]\s*)?",
    r"(monday|mon|tuesday|tues|tue|wednesday|weds|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun)",
    r"\.?[*_]*",
    // Optional date: "(Jan 6)", ", Jan 6", "Jan 6th", "1/6"
    r"(?:,?\s*(?:\([^)]*\)|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?|\d{1,2}/\d{1,2}(?:/\d{2,4})?))?",
    r"[*_]*\s*[:|\-–—][*_\s]*(.*)$",
  ))
  .expect("day line pattern")
});

static DAY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"(?i)^[\s#*_>•+\-]*(?:\d+[.)]\s*)?",
    r"(?:monday|mon|tuesday|tues|tue|wednesday|weds|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun)\b",
  ))
  .expect("day prefix pattern")
});

static PACE_HINT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(?:easy|marathon|tempo|threshold|interval|recovery)\b.*\b\d{1,2}:\d{2}\b")
    .expect("pace hint pattern")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)\[\s*(?:workout[_ ]?id\s*:\s*)?(tempo|intervals?|long[_-]?run|hills?)_([a-z0-9_]+?)_(\d+)\s*\]",
  )
  .expect("reference pattern")
});

/// Keyword table for workouts with no library reference, checked in order
static FALLBACK_TYPES: LazyLock<Vec<(Regex, WorkoutType)>> = LazyLock::new(|| {
  [
    (
      r"(?i)\brest\b.*\b(?:xt|cross[- ]?train\w*|ride|bike|cycl\w*|swim\w*)\b",
      WorkoutType::RestOrCrossTrain,
    ),
    (r"(?i)\b(?:xt|cross[- ]?train\w*)\b.*\brest\b", WorkoutType::RestOrCrossTrain),
    (r"(?i)\b(?:rest|off)\b", WorkoutType::Rest),
    (
      r"(?i)\b(?:ride|bike|biking|cycl\w*|spin|cross[- ]?train\w*|xt|swim\w*)\b",
      WorkoutType::Bike,
    ),
    (r"(?i)\blong\s+run\b", WorkoutType::LongRun),
    (r"(?i)\b(?:easy|recovery|shake-?out|jog|aerobic|run)\b", WorkoutType::Easy),
  ]
  .into_iter()
  .map(|(pattern, kind)| (Regex::new(pattern).expect("fallback type pattern"), kind))
  .collect()
});

/// ---------------------------------------------------------------------------
/// Line Classification
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
  WeekHeader { week_number: u32, distance: Option<f64> },
  /// "Week 0" and the like; week numbers start at 1
  InvalidWeekHeader { week_number: u32 },
  WorkoutLine { day: Weekday, text: String },
  /// Starts with a day name but has no recognizable separator
  UnparsedDayLine(String),
  PaceHint(String),
  Unrecognized,
}

/// Classify one line of plan text. Week headers win over day lines, which win
/// over pace hints.
pub fn classify_line(line: &str) -> LineKind {
  let trimmed = line.trim();
  if trimmed.is_empty() {
    return LineKind::Unrecognized;
  }

  if let Some(caps) = WEEK_HEADER.captures(trimmed) {
    if let Ok(week_number) = caps[1].parse::<u32>() {
      if week_number == 0 {
        return LineKind::InvalidWeekHeader { week_number };
      }
      // Last "<n> <unit>" on the line: dates like "Nov 28" sit earlier
      let distance = distances(trimmed).last();
      return LineKind::WeekHeader { week_number, distance };
    }
  }

  if let Some(caps) = DAY_LINE.captures(trimmed) {
    if let Some(day) = parse_day_name(&caps[1]) {
      return LineKind::WorkoutLine {
        day,
        text: caps[2].trim().to_string(),
      };
    }
  }

  if PACE_HINT.is_match(trimmed) {
    return LineKind::PaceHint(strip_emphasis(trimmed));
  }

  if DAY_PREFIX.is_match(trimmed) {
    return LineKind::UnparsedDayLine(strip_emphasis(trimmed));
  }

  LineKind::Unrecognized
}

fn distances(text: &str) -> impl Iterator<Item = f64> + '_ {
  DISTANCE
    .captures_iter(text)
    .filter(|c| {
      let Some(k) = c.get(2) else { return true };
      // "5k race" names a race, "6 x 1k" is a rep length
      let start = c.get(0).map_or(k.start(), |m| m.start());
      let before = text[..start].trim_end();
      c.get(3).is_none() && !before.ends_with(['x', 'X', '×'])
    })
    .filter_map(|c| c[1].parse::<f64>().ok())
}

/// First "<number> <unit>" in the text
pub fn extract_distance(text: &str) -> Option<f64> {
  distances(text).next()
}

/// Pull a `[kind_CATEGORY_index]` token out of workout text.
/// Returns the display text with the token removed.
pub fn extract_reference(text: &str) -> (String, Option<WorkoutReference>) {
  let Some(caps) = REFERENCE.captures(text) else {
    return (strip_emphasis(text), None);
  };

  let reference = match (caps[1].parse::<WorkoutKind>(), caps[3].parse::<usize>()) {
    (Ok(kind), Ok(index)) => Some(WorkoutReference {
      kind,
      category: caps[2].to_uppercase(),
      index,
    }),
    _ => None,
  };

  let cleaned = REFERENCE.replace_all(text, " ");
  (strip_emphasis(&cleaned), reference)
}

/// Coarse type for a workout that has no library reference
pub fn classify_fallback_type(text: &str) -> WorkoutType {
  FALLBACK_TYPES
    .iter()
    .find(|(pattern, _)| pattern.is_match(text))
    .map(|(_, kind)| *kind)
    .unwrap_or(WorkoutType::Unresolved)
}

fn strip_emphasis(text: &str) -> String {
  let without_marks = text.replace("**", "").replace("__", "");
  let collapsed = without_marks.split_whitespace().collect::<Vec<_>>().join(" ");
  collapsed
    .trim_matches(|c: char| c == '-' || c == ':' || c == '|' || c.is_whitespace())
    .to_string()
}

/// ---------------------------------------------------------------------------
/// Week Accumulation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPlan {
  pub weeks: Vec<ParsedWeek>,
  /// Goal paces; None when the pace engine could not compute them
  pub paces: Option<PaceSet>,
  /// Free-text pace lines, kept only when `paces` is None
  pub pace_hints: Vec<String>,
  pub full_text: String,
  pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
enum OpenWeek {
  None,
  Open(ParsedWeek),
  /// Header seen but the week is being dropped (duplicate or before start)
  Skipped(u32),
}

/// Weeks, pace hints, and diagnostics recovered from raw text
#[derive(Debug, Default)]
pub struct WeekScan {
  pub weeks: Vec<ParsedWeek>,
  pub pace_hints: Vec<(usize, String)>,
  pub diagnostics: Vec<Diagnostic>,
}

/// Scan text into weeks. In regeneration mode (`starting_week` set), weeks
/// numbered below it are dropped so the result can be spliced into an
/// existing plan without renumbering.
pub fn scan_weeks(raw_text: &str, starting_week: Option<u32>) -> WeekScan {
  let mut scan = WeekScan::default();
  let mut seen: HashSet<u32> = HashSet::new();
  let mut open = OpenWeek::None;

  for (idx, line) in raw_text.lines().enumerate() {
    let line_no = idx + 1;

    match classify_line(line) {
      LineKind::WeekHeader { week_number, distance } => {
        if let OpenWeek::Open(week) = std::mem::replace(&mut open, OpenWeek::None) {
          scan.weeks.push(week);
        }

        if !seen.insert(week_number) {
          debug!(week = week_number, line = line_no, "Skipping duplicate week header");
          scan.diagnostics.push(
            Diagnostic::info(DiagnosticKind::DuplicateWeek { week: week_number }).at_line(line_no),
          );
          open = OpenWeek::Skipped(week_number);
          continue;
        }

        if let Some(start) = starting_week.filter(|start| week_number < *start) {
          debug!(week = week_number, starting_week = start, "Skipping week before regeneration start");
          scan.diagnostics.push(
            Diagnostic::info(DiagnosticKind::WeekBeforeStart {
              week: week_number,
              starting_week: start,
            })
            .at_line(line_no),
          );
          open = OpenWeek::Skipped(week_number);
          continue;
        }

        open = OpenWeek::Open(ParsedWeek {
          week_number,
          total_distance: distance.unwrap_or(0.0),
          workouts: Vec::new(),
        });
      }

      LineKind::InvalidWeekHeader { week_number } => {
        if let OpenWeek::Open(week) = std::mem::replace(&mut open, OpenWeek::None) {
          scan.weeks.push(week);
        }
        warn!(week = week_number, line = line_no, "Week header with invalid number; week dropped");
        scan.diagnostics.push(
          Diagnostic::warning(DiagnosticKind::InvalidWeekNumber { week: week_number }).at_line(line_no),
        );
        open = OpenWeek::Skipped(week_number);
      }

      LineKind::WorkoutLine { day, text } => match &mut open {
        OpenWeek::Open(week) => {
          let (display, reference) = extract_reference(&text);
          let inferred_type = classify_fallback_type(&display);
          let distance = extract_distance(&display);
          week.workouts.push(ParsedWorkout {
            day,
            text: display,
            reference,
            inferred_type,
            distance,
            line: line_no,
          });
        }
        OpenWeek::Skipped(week) => {
          debug!(week = *week, line = line_no, "Dropping workout of skipped week");
        }
        OpenWeek::None => {
          info!(line = line_no, "Workout line before any week header; dropped");
          scan
            .diagnostics
            .push(Diagnostic::info(DiagnosticKind::OrphanWorkout { day }).at_line(line_no));
        }
      },

      LineKind::PaceHint(text) => scan.pace_hints.push((line_no, text)),

      LineKind::UnparsedDayLine(text) => {
        debug!(line = line_no, text = %text, "Day line without a separator; dropped");
        scan
          .diagnostics
          .push(Diagnostic::info(DiagnosticKind::UnparsedDayLine { text }).at_line(line_no));
      }

      LineKind::Unrecognized => {}
    }
  }

  if let OpenWeek::Open(week) = open {
    scan.weeks.push(week);
  }

  scan
}

/// Parse generated plan text for a runner.
/// Never fails: formatting gaps and pace failures become diagnostics.
pub fn parse_plan(raw_text: &str, profile: &RunnerProfile, starting_week: Option<u32>) -> ParsedPlan {
  let scan = scan_weeks(raw_text, starting_week);
  let mut diagnostics = scan.diagnostics;

  let paces = PaceTable::builtin()
    .and_then(|table| table.derive(profile.goal.distance, profile.goal.target_time))
    .map(|set| set.for_units(profile.units));

  let (paces, pace_hints) = match paces {
    Ok(set) => (Some(set), Vec::new()),
    Err(e) => {
      info!(error = %e, "Goal paces unavailable; keeping pace hints from text");
      diagnostics.push(Diagnostic::warning(DiagnosticKind::PacesUnavailable {
        reason: e.to_string(),
      }));
      for (line, text) in &scan.pace_hints {
        diagnostics.push(
          Diagnostic::info(DiagnosticKind::PaceHintCaptured { text: text.clone() }).at_line(*line),
        );
      }
      (None, scan.pace_hints.into_iter().map(|(_, text)| text).collect())
    }
  };

  debug!(weeks = scan.weeks.len(), "Parsed plan text");

  ParsedPlan {
    weeks: scan.weeks,
    paces,
    pace_hints,
    full_text: raw_text.to_string(),
    diagnostics,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{sample_profile, synthetic_plan_text};

  #[test]
  fn test_example_plan_excerpt() {
    let text = "### Week 2 (Jan 5 - Jan 11) - 24 miles\n- Tue: [WORKOUT_ID: tempo_THRESHOLD_0] Tempo Run 6 miles\n- Sun: Easy 4 miles";
    let plan = parse_plan(text, &sample_profile(), None);

    assert_eq!(plan.weeks.len(), 1);
    let week = &plan.weeks[0];
    assert_eq!(week.week_number, 2);
    assert_eq!(week.total_distance, 24.0);
    assert_eq!(week.workouts.len(), 2);

    let tue = &week.workouts[0];
    assert_eq!(tue.day, Weekday::Tue);
    assert_eq!(
      tue.reference,
      Some(WorkoutReference {
        kind: WorkoutKind::Tempo,
        category: "THRESHOLD".to_string(),
        index: 0,
      })
    );
    assert_eq!(tue.distance, Some(6.0));
    assert!(!tue.text.contains("WORKOUT_ID"));
    assert_eq!(tue.text, "Tempo Run 6 miles");

    let sun = &week.workouts[1];
    assert_eq!(sun.day, Weekday::Sun);
    assert!(sun.reference.is_none());
    assert_eq!(sun.inferred_type, WorkoutType::Easy);
    assert_eq!(sun.distance, Some(4.0));

    assert!(plan.paces.is_some());
    assert!(plan.pace_hints.is_empty());
  }

  #[test]
  fn test_week_and_day_counts_with_partial_first_week() {
    for partial_days in 1..=7 {
      let text = synthetic_plan_text(4, partial_days);
      let scan = scan_weeks(&text, None);
      assert_eq!(scan.weeks.len(), 5, "partial={}", partial_days);
      assert_eq!(scan.weeks[0].workouts.len(), partial_days);
      for week in &scan.weeks[1..] {
        assert_eq!(week.workouts.len(), 7);
      }
    }
  }

  #[test]
  fn test_duplicate_week_first_occurrence_wins() {
    let text = "Week 1 - 20 miles\nMon: Easy 3 miles\nWeek 2 - 22 miles\nTue: Easy 4 miles\nWeek 1 - 99 miles\nWed: Easy 9 miles\n";
    let scan = scan_weeks(text, None);
    assert_eq!(scan.weeks.len(), 2);
    let week1 = scan.weeks.iter().find(|w| w.week_number == 1).unwrap();
    assert_eq!(week1.total_distance, 20.0);
    assert_eq!(week1.workouts.len(), 1);
    // The duplicate's day line must not leak into week 2 either
    assert_eq!(scan.weeks[1].workouts.len(), 1);
    assert!(scan
      .diagnostics
      .iter()
      .any(|d| d.kind == DiagnosticKind::DuplicateWeek { week: 1 } && d.line == Some(5)));
  }

  #[test]
  fn test_preamble_echo_of_week_is_skipped() {
    let text = "Here is your plan. **Week 1** starts easy.\n\n## Week 1 - 18 mi\n- Mon: Rest\n## Week 2 - 20 mi\n- Mon: Rest\n";
    // The preamble line doesn't start with the week token, so it isn't a header
    let scan = scan_weeks(text, None);
    assert_eq!(scan.weeks.len(), 2);
    assert_eq!(scan.weeks[0].total_distance, 18.0);
  }

  #[test]
  fn test_starting_week_skips_earlier_weeks() {
    let text = synthetic_plan_text(5, 7);
    let scan = scan_weeks(&text, Some(3));
    let numbers: Vec<u32> = scan.weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![3, 4, 5, 6]);
    assert!(scan
      .diagnostics
      .iter()
      .any(|d| matches!(d.kind, DiagnosticKind::WeekBeforeStart { week: 1, starting_week: 3 })));
  }

  #[test]
  fn test_orphan_day_line_dropped() {
    let text = "Mon: Easy 3 miles\nWeek 1 - 10 miles\nTue: Easy 5 miles\n";
    let scan = scan_weeks(text, None);
    assert_eq!(scan.weeks.len(), 1);
    assert_eq!(scan.weeks[0].workouts.len(), 1);
    assert_eq!(
      scan.diagnostics[0].kind,
      DiagnosticKind::OrphanWorkout { day: Weekday::Mon }
    );
    assert_eq!(scan.diagnostics[0].line, Some(1));
  }

  #[test]
  fn test_header_distance_uses_last_match() {
    match classify_line("### Week 3 (Nov 28 - Dec 4): 10 km long run, total 30 km") {
      LineKind::WeekHeader { week_number, distance } => {
        assert_eq!(week_number, 3);
        assert_eq!(distance, Some(30.0));
      }
      other => panic!("expected week header, got {:?}", other),
    }
  }

  #[test]
  fn test_header_without_distance() {
    assert_eq!(
      classify_line("**Week 4: Recovery**"),
      LineKind::WeekHeader { week_number: 4, distance: None }
    );
    let scan = scan_weeks("Week 4\nMon: Rest", None);
    assert_eq!(scan.weeks[0].total_distance, 0.0);
  }

  #[test]
  fn test_day_line_formats() {
    let cases = [
      ("- **Mon:** Rest", Weekday::Mon, "Rest"),
      ("* Wednesday - Easy 5 mi", Weekday::Wed, "Easy 5 mi"),
      ("1. Thurs: Easy 4 miles", Weekday::Thu, "Easy 4 miles"),
      ("**Friday**: Rest/XT", Weekday::Fri, "Rest/XT"),
      ("Sat (Jan 10): Long run 10 miles", Weekday::Sat, "Long run 10 miles"),
      ("• sun — Easy 3 mi", Weekday::Sun, "Easy 3 mi"),
    ];
    for (line, day, text) in cases {
      match classify_line(line) {
        LineKind::WorkoutLine { day: d, text: t } => {
          assert_eq!(d, day, "{}", line);
          assert_eq!(strip_emphasis(&t), text, "{}", line);
        }
        other => panic!("{} classified as {:?}", line, other),
      }
    }
  }

  #[test]
  fn test_unrecognized_lines() {
    assert_eq!(classify_line(""), LineKind::Unrecognized);
    assert_eq!(classify_line("Stay hydrated and sleep well."), LineKind::Unrecognized);
    assert_eq!(classify_line("Monthly mileage: 30"), LineKind::Unrecognized);
    assert_eq!(
      classify_line("Sunday long run without separator"),
      LineKind::UnparsedDayLine("Sunday long run without separator".to_string())
    );
  }

  #[test]
  fn test_dated_day_lines() {
    let cases = [
      ("Monday, Jan 6: Easy 3 miles", Weekday::Mon, "Easy 3 miles"),
      ("Tue Jan 7 - Tempo 5 miles", Weekday::Tue, "Tempo 5 miles"),
      ("- **Wed, January 8th:** Easy 4 mi", Weekday::Wed, "Easy 4 mi"),
      ("Thu 1/9: Rest", Weekday::Thu, "Rest"),
    ];
    for (line, day, text) in cases {
      match classify_line(line) {
        LineKind::WorkoutLine { day: d, text: t } => {
          assert_eq!(d, day, "{}", line);
          assert_eq!(strip_emphasis(&t), text, "{}", line);
        }
        other => panic!("{} classified as {:?}", line, other),
      }
    }

    let scan = scan_weeks(
      "Week 1 - 10 miles\nMonday, Jan 6: Easy 3 miles\nTue Jan 7 - Tempo 5 miles\nWed: Easy 8k\n",
      None,
    );
    let workouts: Vec<(Weekday, Option<f64>)> = scan.weeks[0].workouts.iter().map(|w| (w.day, w.distance)).collect();
    assert_eq!(
      workouts,
      vec![(Weekday::Mon, Some(3.0)), (Weekday::Tue, Some(5.0)), (Weekday::Wed, Some(8.0))]
    );
    assert!(scan.diagnostics.is_empty());
  }

  #[test]
  fn test_unparsed_day_line_recorded() {
    let scan = scan_weeks("Week 1 - 10 miles\nMon: Easy 3 miles\nTuesday tempo 5 miles\n", None);
    assert_eq!(scan.weeks[0].workouts.len(), 1);
    assert_eq!(scan.diagnostics.len(), 1);
    let diagnostic = &scan.diagnostics[0];
    assert_eq!(diagnostic.severity, crate::models::Severity::Info);
    assert_eq!(diagnostic.line, Some(3));
    assert_eq!(
      diagnostic.kind,
      DiagnosticKind::UnparsedDayLine { text: "Tuesday tempo 5 miles".to_string() }
    );
  }

  #[test]
  fn test_week_zero_dropped() {
    assert_eq!(
      classify_line("Week 0 - 10 miles"),
      LineKind::InvalidWeekHeader { week_number: 0 }
    );

    let scan = scan_weeks("Week 1 - 8 miles\nMon: Easy 3 miles\nWeek 0 - 10 miles\nTue: Easy 5 miles\nWeek 2 - 12 miles\nWed: Easy 4 miles\n", None);
    let weeks: Vec<(u32, usize)> = scan.weeks.iter().map(|w| (w.week_number, w.workouts.len())).collect();
    assert_eq!(weeks, vec![(1, 1), (2, 1)]);
    assert!(scan.diagnostics.iter().any(|d| d.kind == DiagnosticKind::InvalidWeekNumber { week: 0 }
      && d.severity == crate::models::Severity::Warning
      && d.line == Some(3)));
  }

  #[test]
  fn test_pace_hint_line() {
    assert_eq!(
      classify_line("**Easy pace:** 10:30-11:00 per mile"),
      LineKind::PaceHint("Easy pace: 10:30-11:00 per mile".to_string())
    );
  }

  #[test]
  fn test_extract_reference_variants() {
    let (text, reference) = extract_reference("[long_run_PROGRESSION_1] Long Run 12 miles");
    assert_eq!(text, "Long Run 12 miles");
    let reference = reference.unwrap();
    assert_eq!(reference.kind, WorkoutKind::LongRun);
    assert_eq!(reference.category, "PROGRESSION");
    assert_eq!(reference.index, 1);

    let (_, reference) = extract_reference("Track [intervals_vo2max_2] 7 miles");
    let reference = reference.unwrap();
    assert_eq!(reference.kind, WorkoutKind::Interval);
    assert_eq!(reference.category, "VO2MAX");
    assert_eq!(reference.index, 2);

    let (_, reference) = extract_reference("[hill_SHORT_HILLS_0] Hill repeats 6 mi");
    let reference = reference.unwrap();
    assert_eq!(reference.category, "SHORT_HILLS");

    let (text, reference) = extract_reference("Easy 4 miles");
    assert_eq!(text, "Easy 4 miles");
    assert!(reference.is_none());
  }

  #[test]
  fn test_fallback_type_table() {
    let cases = [
      ("Rest", WorkoutType::Rest),
      ("Day off", WorkoutType::Rest),
      ("Rest/XT", WorkoutType::RestOrCrossTrain),
      ("Rest or cross-train 30 min", WorkoutType::RestOrCrossTrain),
      ("Rest / optional easy ride", WorkoutType::RestOrCrossTrain),
      ("XT or rest", WorkoutType::RestOrCrossTrain),
      ("Bike 45 min", WorkoutType::Bike),
      ("Easy ride 60 min", WorkoutType::Bike),
      ("Cross-training 40 min", WorkoutType::Bike),
      ("Long run 12 miles", WorkoutType::LongRun),
      ("Easy 4 miles", WorkoutType::Easy),
      ("Recovery jog 3 mi", WorkoutType::Easy),
      ("Strides and drills", WorkoutType::Unresolved),
      ("", WorkoutType::Unresolved),
    ];
    for (text, expected) in cases {
      assert_eq!(classify_fallback_type(text), expected, "{}", text);
    }
  }

  #[test]
  fn test_extract_distance() {
    assert_eq!(extract_distance("Tempo Run 6 miles"), Some(6.0));
    assert_eq!(extract_distance("Easy 6.5km"), Some(6.5));
    assert_eq!(extract_distance("Bike 45 minutes"), None);
    assert_eq!(extract_distance("Easy 8k"), Some(8.0));
    assert_eq!(extract_distance("5k race, then cool down 2 miles"), Some(2.0));
    assert_eq!(extract_distance("10K pace work"), None);
    assert_eq!(extract_distance("3 x 2 min at 5k effort"), None);
    assert_eq!(extract_distance("6 x 1k @ interval, 7 miles total"), Some(7.0));
  }

  #[test]
  fn test_pace_hints_kept_when_goal_out_of_range() {
    let mut profile = sample_profile();
    profile.goal.target_time = "3:00:00".parse().unwrap();
    let text = "Week 1 - 10 miles\nEasy pace: 11:00/mi\nMon: Easy 3 miles\n";
    let plan = parse_plan(text, &profile, None);
    assert!(plan.paces.is_none());
    assert_eq!(plan.pace_hints, vec!["Easy pace: 11:00/mi".to_string()]);
    assert!(plan
      .diagnostics
      .iter()
      .any(|d| matches!(d.kind, DiagnosticKind::PacesUnavailable { .. })));
    assert_eq!(plan.weeks[0].workouts.len(), 1);
  }
}
