use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ledger_quest::catalog::Case;
use ledger_quest::model::{JournalLine, LineField};
use ledger_quest::session::lessons::LessonAction;
use ledger_quest::validate::check_entry;
use ledger_quest::{Amount, Catalog, Command, Engine};

/// Commands that solve every lesson case in order.
///
/// Per case:
/// 1. Open the exercise (after `Start` for the first one)
/// 2. Pick the error type
/// 3. Fill in the expected journal lines
/// 4. Answer the impact question, if any
/// 5. Submit
fn solve_all(catalog: &Catalog) -> Vec<Command> {
    let mut actions = vec![LessonAction::Start];
    for case in &catalog.lessons.cases {
        actions.extend(solve(case));
    }
    actions.into_iter().map(Command::Lessons).collect()
}

fn solve(case: &Case) -> Vec<LessonAction> {
    let mut actions = vec![
        LessonAction::OpenExercise,
        LessonAction::SelectErrorType(case.error_type.clone()),
    ];

    for (index, line) in case.correct_journal_entry.iter().enumerate() {
        if index >= 2 {
            actions.push(LessonAction::AddLine);
        }
        actions.push(edit(index, LineField::Account, line.account.clone()));
        if let Some(debit) = line.debit {
            actions.push(edit(index, LineField::Debit, debit.to_string()));
        }
        if let Some(credit) = line.credit {
            actions.push(edit(index, LineField::Credit, credit.to_string()));
        }
    }

    if let Some(impact) = &case.impact_question {
        actions.push(LessonAction::SelectImpact(impact.correct_answer.clone()));
    }
    actions.push(LessonAction::Submit);
    actions
}

fn edit(index: usize, field: LineField, value: String) -> LessonAction {
    LessonAction::EditLine {
        index,
        field,
        value,
    }
}

/// A balanced entry alternating debit and credit lines of 100 each.
fn balanced_entry(lines: usize) -> Vec<JournalLine> {
    (0..lines)
        .map(|i| {
            let amount = Amount::from_scaled(1_000_000);
            if i % 2 == 0 {
                JournalLine::debit(format!("Account {i}"), amount)
            } else {
                JournalLine::credit(format!("Account {i}"), amount)
            }
        })
        .collect()
}

fn bench_lessons_playthrough(c: &mut Criterion) {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let commands = solve_all(&catalog);

    c.bench_function("lessons_playthrough", |b| {
        b.iter(|| {
            let mut engine = Engine::new(catalog.clone());
            for command in commands.iter().cloned() {
                let _ = black_box(engine.apply(command));
            }
            engine
        });
    });
}

fn bench_rejected_submits(c: &mut Criterion) {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let mut group = c.benchmark_group("rejected_submits");

    // Wrong error type on the first case, submitted over and over
    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut engine = Engine::new(catalog.clone());
                let setup = [
                    LessonAction::Start,
                    LessonAction::OpenExercise,
                    LessonAction::SelectErrorType("Mathematical error".into()),
                ];
                for action in setup {
                    let _ = engine.apply(Command::Lessons(action));
                }
                for _ in 0..count {
                    let _ = black_box(engine.apply(Command::Lessons(LessonAction::Submit)));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_check_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_entry");

    for lines in [2usize, 100, 10_000] {
        let entry = balanced_entry(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &entry, |b, entry| {
            b.iter(|| black_box(check_entry(black_box(entry))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lessons_playthrough,
    bench_rejected_submits,
    bench_check_entry
);
criterion_main!(benches);
