/// Text commands driving the point store.
///
/// ```text
/// add NAME [icon=N] [index=N] [symbol=N] [type=T] [logic=L]
/// set KEY=VALUE...          (applies to the selected point)
/// select TARGET | select none
/// deselect
/// delete [TARGET]           (defaults to the selected point)
/// ```
///
/// `NAME` is a bare word or a double-quoted string. `TARGET` is `#N`, the
/// 1-based position in the point list, or a name. `select "none"` selects a
/// point named none. Intensities above 100 are clamped.
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{alpha1, char, digit1, space0, space1},
    combinator::{map, opt, verify},
    multi::many0,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

use crate::error::CommandError;
use crate::sign::{AnchorKey, SignLogic, SignType};
use crate::store::{Draft, PointId, PointStore, PointUpdate, SemioticPoint, Selection};
use crate::sync::RenderSync;

/// Reference to a point in a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based list position
    Position(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String, changes: PointUpdate },
    Set(PointUpdate),
    Select(Option<Target>),
    Delete(Option<Target>),
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added(PointId),
    Updated(PointId),
    Selected(Selection),
    Deleted(PointId),
}

type NomError<'a> = nom::Err<nom::error::Error<&'a str>>;

fn syntax_error(err: NomError<'_>) -> CommandError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) if e.input.is_empty() => {
            CommandError::Syntax("unexpected end of command".to_string())
        }
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            CommandError::Syntax(format!("unexpected input near `{}`", e.input))
        }
        nom::Err::Incomplete(_) => CommandError::Syntax("incomplete command".to_string()),
    }
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '=' || c == '"')(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    alt((quoted, bare))(input)
}

fn target(input: &str) -> IResult<&str, Target> {
    alt((
        map(preceded(char('#'), digit1), |digits: &str| {
            Target::Position(digits.parse().unwrap_or(usize::MAX))
        }),
        map(name, |n: &str| Target::Name(n.to_string())),
    ))(input)
}

/// Target of `select`: a bare `none` clears the selection, a quoted one is
/// a name
fn selection_target(input: &str) -> IResult<&str, Option<Target>> {
    alt((
        map(verify(bare, |word: &str| word.eq_ignore_ascii_case("none")), |_| None),
        map(target, Some),
    ))(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(alpha1, delimited(space0, char('='), space0), bare)(input)
}

fn assignments(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    many0(preceded(space1, assignment))(input)
}

/// Ensure only trailing whitespace remains
fn finish(rest: &str) -> Result<(), CommandError> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(CommandError::Syntax(format!(
            "unexpected input near `{}`",
            rest.trim()
        )))
    }
}

fn to_update(pairs: &[(&str, &str)]) -> Result<PointUpdate, CommandError> {
    let mut changes = PointUpdate::new();
    for &(key, value) in pairs {
        match key.to_ascii_lowercase().as_str() {
            "type" => changes = changes.with_sign_type(value.parse().map_err(CommandError::Syntax)?),
            "logic" => {
                changes = changes.with_sign_logic(value.parse().map_err(CommandError::Syntax)?)
            }
            other => {
                let key: AnchorKey = other.parse().map_err(CommandError::Syntax)?;
                if !value.chars().all(|c| c.is_ascii_digit()) {
                    return Err(CommandError::Syntax(format!(
                        "`{key_name}` expects a whole number, got `{value}`",
                        key_name = key.label().to_ascii_lowercase()
                    )));
                }
                // Only digits remain, so a failure means overflow
                let amount = value.parse::<u32>().unwrap_or(u32::MAX);
                changes = changes.with_intensity(key, amount);
            }
        }
    }
    Ok(changes)
}

/// Parse one command line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let (rest, verb) = preceded(space0, alpha1)(line).map_err(syntax_error)?;

    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let (rest, name) = preceded(space1, name)(rest).map_err(syntax_error)?;
            let (rest, pairs) = assignments(rest).map_err(syntax_error)?;
            finish(rest)?;
            Ok(Command::Add {
                name: name.to_string(),
                changes: to_update(&pairs)?,
            })
        }
        "set" => {
            let (rest, pairs) = assignments(rest).map_err(syntax_error)?;
            finish(rest)?;
            if pairs.is_empty() {
                return Err(CommandError::Syntax("`set` needs at least one KEY=VALUE".to_string()));
            }
            Ok(Command::Set(to_update(&pairs)?))
        }
        "select" => {
            let (rest, target) = preceded(space1, selection_target)(rest).map_err(syntax_error)?;
            finish(rest)?;
            Ok(Command::Select(target))
        }
        "deselect" => {
            finish(rest)?;
            Ok(Command::Select(None))
        }
        "delete" => {
            let (rest, target) = opt(preceded(space1, target))(rest).map_err(syntax_error)?;
            finish(rest)?;
            Ok(Command::Delete(target))
        }
        other => Err(CommandError::Syntax(format!(
            "unknown command `{other}`; expected add|set|select|deselect|delete"
        ))),
    }
}

/// Resolve a target to a point id
pub fn resolve<S: RenderSync>(store: &PointStore<S>, target: &Target) -> Result<PointId, CommandError> {
    let found = match target {
        Target::Position(n) => n.checked_sub(1).and_then(|index| store.nth(index)),
        Target::Name(name) => store.find_by_name(name),
    };
    found.map(SemioticPoint::id).ok_or_else(|| {
        CommandError::UnknownTarget(match target {
            Target::Position(n) => format!("#{n}"),
            Target::Name(name) => name.clone(),
        })
    })
}

/// Run a parsed command.
///
/// `draft` supplies the attributes an `add` does not mention.
pub fn execute<S: RenderSync>(
    store: &mut PointStore<S>,
    command: &Command,
    draft: &Draft,
) -> Result<Outcome, CommandError> {
    match command {
        Command::Add { name, changes } => {
            let mut attributes = *draft;
            attributes.apply(changes);
            let id = store.add(
                name,
                attributes.intensities,
                attributes.sign_type,
                attributes.sign_logic,
            )?;
            Ok(Outcome::Added(id))
        }
        Command::Set(changes) => {
            let id = store.selected_id().ok_or(CommandError::NoSelection)?;
            store.update(id, changes)?;
            Ok(Outcome::Updated(id))
        }
        Command::Select(target) => {
            let id = match target {
                Some(target) => Some(resolve(store, target)?),
                None => None,
            };
            Ok(Outcome::Selected(store.select(id)?))
        }
        Command::Delete(target) => {
            let id = match target {
                Some(target) => resolve(store, target)?,
                None => store.selected_id().ok_or(CommandError::NoSelection)?,
            };
            store.delete(id);
            Ok(Outcome::Deleted(id))
        }
    }
}

/// Parse and run a script, one command per line.
///
/// Blank lines and lines starting with `//` are skipped. Stops at the first
/// failing line. Returns the number of commands run.
pub fn run_script<S: RenderSync>(
    store: &mut PointStore<S>,
    script: &str,
    draft: &Draft,
) -> Result<usize, CommandError> {
    let mut count = 0;
    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        parse_command(line)
            .and_then(|command| execute(store, &command, draft))
            .map_err(|source| CommandError::AtLine {
                line: number + 1,
                source: Box::new(source),
            })?;
        count += 1;
    }
    tracing::info!(commands = count, "script finished");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projector;
    use crate::sign::Intensities;
    use crate::store::SelectionPolicy;

    fn store() -> PointStore {
        PointStore::new(Projector::default(), SelectionPolicy::Toggle, ())
    }

    #[test]
    fn test_parse_add_with_attributes() {
        let command = parse_command(r#"add "Smoke signal" icono=10 index = 250 type=Legisign logic=dicent"#).unwrap();
        assert_eq!(
            command,
            Command::Add {
                name: "Smoke signal".to_string(),
                changes: PointUpdate::new()
                    .with_intensity(AnchorKey::Icon, 10)
                    .with_intensity(AnchorKey::Index, 250)
                    .with_sign_type(SignType::Legisign)
                    .with_sign_logic(SignLogic::Dicent),
            }
        );
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            parse_command("select #2").unwrap(),
            Command::Select(Some(Target::Position(2)))
        );
        assert_eq!(parse_command("select none").unwrap(), Command::Select(None));
        assert_eq!(parse_command("select NONE").unwrap(), Command::Select(None));
        assert_eq!(
            parse_command("select \"none\"").unwrap(),
            Command::Select(Some(Target::Name("none".to_string())))
        );
        assert_eq!(
            parse_command("select nonesuch").unwrap(),
            Command::Select(Some(Target::Name("nonesuch".to_string())))
        );
        assert_eq!(parse_command("  deselect ").unwrap(), Command::Select(None));
        assert_eq!(parse_command("delete").unwrap(), Command::Delete(None));
        assert_eq!(
            parse_command("delete \"Road sign\"").unwrap(),
            Command::Delete(Some(Target::Name("Road sign".to_string())))
        );
    }

    #[test]
    fn test_parse_errors() {
        for line in ["", "fly away", "add", "set", "set icon=abc", "set colour=3", "add x logic=poem", "select"] {
            assert!(
                matches!(parse_command(line), Err(CommandError::Syntax(_))),
                "`{line}` should be rejected"
            );
        }
    }

    #[test]
    fn test_execute_add_uses_draft_defaults() {
        let mut store = store();
        let draft = Draft {
            intensities: Intensities::new(10, 20, 30),
            sign_type: SignType::Qualisign,
            sign_logic: SignLogic::Argument,
        };
        let command = parse_command("add Thermometer symbol=90").unwrap();
        let Outcome::Added(id) = execute(&mut store, &command, &draft).unwrap() else {
            panic!("expected an added point");
        };

        let point = store.get(id).unwrap();
        assert_eq!(point.intensities(), Intensities::new(10, 20, 90));
        assert_eq!(point.sign_type(), SignType::Qualisign);
        assert_eq!(point.sign_logic(), SignLogic::Argument);
    }

    #[test]
    fn test_execute_set_requires_selection() {
        let mut store = store();
        let draft = Draft::default();
        let command = parse_command("set icon=5").unwrap();
        assert_eq!(execute(&mut store, &command, &draft), Err(CommandError::NoSelection));
    }

    #[test]
    fn test_execute_select_and_delete_by_target() {
        let mut store = store();
        let draft = Draft::default();
        run_script(&mut store, "add a\nadd b\nadd c", &draft).unwrap();

        let outcome = execute(&mut store, &parse_command("select #1").unwrap(), &draft).unwrap();
        let first = store.nth(0).unwrap().id();
        assert_eq!(outcome, Outcome::Selected(Selection::Selected(first)));

        execute(&mut store, &parse_command("delete B").unwrap(), &draft).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.find_by_name("b").is_none());

        let err = execute(&mut store, &parse_command("select #9").unwrap(), &draft).unwrap_err();
        assert_eq!(err, CommandError::UnknownTarget("#9".to_string()));
    }

    #[test]
    fn test_point_named_none_can_be_selected() {
        let mut store = store();
        let draft = Draft::default();
        run_script(&mut store, "add \"none\"\nadd other", &draft).unwrap();
        let none = store.find_by_name("none").unwrap().id();

        let outcome = execute(&mut store, &parse_command("select \"none\"").unwrap(), &draft).unwrap();
        assert_eq!(outcome, Outcome::Selected(Selection::Selected(none)));

        let outcome = execute(&mut store, &parse_command("select none").unwrap(), &draft).unwrap();
        assert_eq!(outcome, Outcome::Selected(Selection::Unselected));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_script_reports_failing_line() {
        let mut store = store();
        let script = "// two signs\nadd a\n\nadd \"   \"\nadd c\n";
        let err = run_script(&mut store, script, &Draft::default()).unwrap_err();
        match err {
            CommandError::AtLine { line, source } => {
                assert_eq!(line, 4);
                assert!(matches!(*source, CommandError::Store(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }
}
