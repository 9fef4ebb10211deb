use std::io::Result;

use cmdcolor::{
    args, color_name, Arg, ColorPolicy, ColorValue, Options, Stream, Terminal, BRIGHT, RESET_BG,
    RESET_BRIGHT, RESET_FG,
};

/// Print the sixteen named colors as foreground and background colors.
fn chart16(terminal: &mut Terminal) -> Result<()> {
    let tight = Options::builder().separator("").build();
    terminal.printc(
        &args!["standard text, ", BRIGHT, "bold text", RESET_BRIGHT, "."],
        &tight,
    )?;
    terminal.printc(
        &args![format!(" {:<26}  {:<26}", "foreground colors", "background colors")],
        &tight,
    )?;

    for index in 0..8 {
        let name = format!("{:<7}", color_name(index).unwrap_or("?"));
        terminal.printc(
            &args![
                format!("  {:2}:", index),
                ColorValue::fg(index),
                name.as_str(),
                RESET_FG,
                format!("  {:2}:", index + 8),
                ColorValue::fg_intensity(index, true),
                name.as_str(),
                RESET_FG,
                format!("  {:2}:", index),
                ColorValue::bg(index),
                name.as_str(),
                RESET_BG,
                format!("  {:2}:", index + 8),
                ColorValue::bg_intensity(index, true),
                name.as_str(),
                RESET_BG,
            ],
            &tight,
        )?;
    }
    Ok(())
}

/// Print a row of palette indices.
fn row<I>(terminal: &mut Terminal, indices: I, background: bool) -> Result<()>
where
    I: IntoIterator<Item = u8>,
{
    let mut args: Vec<Arg<'_>> = Vec::new();
    for index in indices {
        let color = if background {
            ColorValue::bg(index)
        } else {
            ColorValue::fg(index)
        };
        args.push(color.into());
        args.push(format!("{:03}", index).into());
    }
    terminal.printc(&args, &Options::default())
}

/// Print the 256-color palette.
fn chart256(terminal: &mut Terminal, background: bool) -> Result<()> {
    row(terminal, 0..16, background)?;

    for r in 0..6 {
        for g in 0..6 {
            row(terminal, (0..6).map(|b| 16 + b + 6 * (g + 6 * r)), background)?;
        }
    }

    row(terminal, 232..244, background)?;
    row(terminal, 244..=255, background)
}

fn main() -> Result<()> {
    let flags: Vec<String> = std::env::args().skip(1).collect();
    let has = |flag: &str| flags.iter().any(|f| f == flag);

    let mut terminal = Terminal::new();
    if has("--force") {
        terminal.set_policy(ColorPolicy::On);
    }
    if has("--ansi") {
        terminal.set_policy(ColorPolicy::ForceAnsi);
    }

    let stdout = Stream::Stdout;
    let status = if terminal.will_use_color(stdout) {
        format!(
            "{} colors ({})",
            terminal.color_count(stdout),
            terminal.backend_name(stdout)
        )
    } else {
        "no colors".to_string()
    };
    terminal.printc(&args!["stdout:", BRIGHT, status], &Options::default())?;

    if has("--chart256") || has("--chart256bg") {
        chart256(&mut terminal, has("--chart256bg"))
    } else {
        chart16(&mut terminal)
    }
}
