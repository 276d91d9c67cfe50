use super::types::{Command, Heading, Waypoint};

/// Heading needed to drive from `from` to `to`. Vertical displacement wins;
/// y grows downwards, so a smaller y is North.
pub fn direction_between(from: &Waypoint, to: &Waypoint) -> Heading {
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);

    if dy < 0 {
        Heading::North
    } else if dy > 0 {
        Heading::South
    } else if dx > 0 {
        Heading::East
    } else {
        Heading::West
    }
}

/// Turn commands that rotate `current` onto `target`. A reversal is two
/// right turns; the device has no dedicated U-turn.
pub fn turn_commands(current: Heading, target: Heading) -> &'static [Command] {
    match current.quarter_turns_to(target) {
        0 => &[],
        1 => &[Command::TurnRight],
        2 => &[Command::TurnRight, Command::TurnRight],
        _ => &[Command::TurnLeft],
    }
}

/// Compiles a path into the command sequence for a device that starts out
/// facing `initial_heading`. Always ends with a single `Halt`.
pub fn compile(path: &[Waypoint], initial_heading: Heading) -> Vec<Command> {
    if path.len() < 2 {
        return vec![Command::Halt];
    }

    let mut commands = Vec::with_capacity(path.len() * 2);
    let mut heading = initial_heading;
    for step in path.windows(2) {
        let target = direction_between(&step[0], &step[1]);
        commands.extend_from_slice(turn_commands(heading, target));
        heading = target;
        commands.push(Command::Advance);
    }
    commands.push(Command::Halt);
    commands
}

/// Heading the device is assumed to face after driving `path`.
pub fn final_heading(path: &[Waypoint], initial_heading: Heading) -> Heading {
    path.windows(2)
        .last()
        .map(|step| direction_between(&step[0], &step[1]))
        .unwrap_or(initial_heading)
}
