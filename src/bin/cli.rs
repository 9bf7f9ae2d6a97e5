use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use content_calendar::{
    FormatCatalog, Frequency, MemoryPlannerStore, MonthView, Planner, PlannerConfig, PlannerError,
    Recurrence, calendar::week_header, color_for, load_entries_from_csv, load_snapshot_from_json,
    logging, save_entries_to_csv, save_snapshot_to_json,
};

/// Interactive content calendar.
#[derive(Parser)]
#[command(name = "cli", version, about = "Plan content on a month calendar")]
struct Args {
    /// SQLite database file (overrides the config file and CONTENT_CALENDAR_DB).
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk.
    #[arg(long)]
    memory: bool,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Split a command line on whitespace, keeping double-quoted runs together.
fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn cell_label(date: NaiveDate, in_current_month: bool, is_today: bool, entries: usize) -> String {
    let mut label = if in_current_month {
        date.day().to_string()
    } else {
        format!("({})", date.day())
    };
    if is_today {
        label.push('*');
    }
    if entries > 0 {
        label.push_str(&format!(" [{entries}]"));
    }
    label
}

fn render_grid_as_text_table(view: &MonthView) -> String {
    let header: Vec<String> = week_header(view.week_start)
        .iter()
        .map(|wd| wd.to_string())
        .collect();
    let rows: Vec<Vec<String>> = view
        .weeks()
        .map(|week| {
            week.iter()
                .map(|cell| {
                    cell_label(cell.date, cell.in_current_month, cell.is_today, cell.entries.len())
                })
                .collect()
        })
        .collect();

    // Compute column widths
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, value) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(value.chars().count());
        }
    }

    // Build horizontal separator
    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", view.title()));
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&header));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');

    for cell in view.agenda() {
        out.push_str(&format!("{} {}\n", cell.date, cell.date.weekday()));
        for entry in &cell.entries {
            out.push_str(&format!(
                "  #{} [{}] {}\n",
                entry.id.map(|id| id.to_string()).unwrap_or_default(),
                entry.format,
                entry.title
            ));
        }
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                      Show this help\n  show                                      Show the current month\n  next | prev                               Move one month forward/back\n  today                                     Jump to the current month\n  goto <YYYY-MM>                            Jump to a month\n  day <YYYY-MM-DD>                          List entries on a date\n  add <YYYY-MM-DD> <format> <title...>      Schedule an entry\n  repeat <YYYY-MM-DD> <format> <daily|weekly|monthly> <count> <title...>\n                                            Schedule a recurring entry\n  delete <id>                               Delete an entry\n  formats                                   List formats with their colours\n  format add <name...>                      Add a format\n  format rename <old> <new>                 Rename a format and its entries\n  format remove <name...>                   Remove an unused format\n  color <tag...>                            Show the colour of a tag\n  export <json|csv> <path>                  Write formats/entries to disk\n  import <json|csv> <path>                  Merge formats/entries from disk\n  quit|exit                                 Exit\n\nQuote arguments containing spaces, e.g. add 2024-08-05 \"Post Instagram\" Launch"
    );
}

fn print_formats(planner: &Planner) {
    match planner.formats() {
        Ok(formats) if formats.is_empty() => println!("No formats defined."),
        Ok(formats) => {
            println!("Formats:");
            for name in formats {
                println!("  {}  {}", color_for(&name).hex(), name);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn print_month(planner: &Planner, today: NaiveDate) {
    match planner.month_view(today) {
        Ok(view) => println!("{}", render_grid_as_text_table(&view)),
        Err(e) => println!("Error: {}", e),
    }
}

fn open_planner(args: &Args, today: NaiveDate) -> Result<Planner, PlannerError> {
    let mut config = PlannerConfig::load_or_default(args.config.as_deref())?;
    if let Some(db) = &args.db {
        config.database = db.clone();
    }
    if args.memory {
        let catalog = FormatCatalog::from_names(&config.default_formats)?;
        let store = MemoryPlannerStore::with_catalog(catalog);
        return Ok(Planner::new(Box::new(store), today, config.week_start()?));
    }
    Planner::from_config(&config, today)
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let today = Local::now().date_naive();
    let mut planner = match open_planner(&args, today) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    println!("Content Calendar (CLI) - type 'help' for commands\n");
    print_month(&planner, today);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let parts = match split_args(line.trim()) {
            Ok(parts) => parts,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };
        let Some(cmd) = parts.first().map(String::as_str) else {
            continue;
        };
        let rest = &parts[1..];

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_month(&planner, today),
            "next" | "prev" => {
                let moved = if cmd == "next" {
                    planner.next_month()
                } else {
                    planner.prev_month()
                };
                match moved {
                    Ok(_) => print_month(&planner, today),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "today" => {
                planner.jump_to_date(today);
                print_month(&planner, today);
            }
            "goto" => match rest.first().and_then(|s| parse_year_month(s)) {
                Some((year, month)) => match planner.jump_to(year, month) {
                    Ok(_) => print_month(&planner, today),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: goto <YYYY-MM>"),
            },
            "day" => match rest.first().and_then(|s| parse_date(s)) {
                Some(date) => match planner.entries_on(date) {
                    Ok(entries) if entries.is_empty() => println!("No entries on {}.", date),
                    Ok(entries) => {
                        println!("Entries on {}:", date);
                        for entry in entries {
                            println!(
                                "  #{} [{}] {}",
                                entry.id.map(|id| id.to_string()).unwrap_or_default(),
                                entry.format,
                                entry.title
                            );
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: day <YYYY-MM-DD>"),
            },
            "add" => {
                if rest.len() < 3 {
                    println!("Usage: add <YYYY-MM-DD> <format> <title...>");
                    continue;
                }
                let Some(date) = parse_date(&rest[0]) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let title = rest[2..].join(" ");
                match planner.schedule(&title, date, &rest[1]) {
                    Ok(entry) => println!(
                        "Scheduled entry {} on {}: [{}] {}",
                        entry.id.map(|id| id.to_string()).unwrap_or_default(),
                        entry.date,
                        entry.format,
                        entry.title
                    ),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "repeat" => {
                if rest.len() < 5 {
                    println!(
                        "Usage: repeat <YYYY-MM-DD> <format> <daily|weekly|monthly> <count> <title...>"
                    );
                    continue;
                }
                let Some(date) = parse_date(&rest[0]) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let frequency = match rest[2].parse::<Frequency>() {
                    Ok(f) => f,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let Ok(count) = rest[3].parse::<u32>() else {
                    println!("Invalid count");
                    continue;
                };
                let recurrence = match Recurrence::new(frequency, count) {
                    Ok(r) => r,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let title = rest[4..].join(" ");
                match planner.schedule_recurring(&title, date, &rest[1], recurrence) {
                    Ok(saved) => println!("Scheduled {} entries ({}).", saved.len(), frequency),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "delete" => match rest.first().map(|s| s.parse::<i64>()) {
                Some(Ok(id)) => match planner.delete_entry(id) {
                    Ok(()) => println!("Deleted entry {}.", id),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: delete <id>"),
            },
            "formats" => print_formats(&planner),
            "format" => match rest.first().map(String::as_str) {
                Some("add") if rest.len() > 1 => {
                    let name = rest[1..].join(" ");
                    match planner.add_format(&name) {
                        Ok(()) => println!("Format '{}' added.", name.trim()),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                Some("rename") if rest.len() == 3 => {
                    match planner.rename_format(&rest[1], &rest[2]) {
                        Ok(moved) => println!(
                            "Format '{}' renamed to '{}' ({} entries updated).",
                            rest[1],
                            rest[2].trim(),
                            moved
                        ),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                Some("remove") if rest.len() > 1 => {
                    let name = rest[1..].join(" ");
                    match planner.remove_format(&name) {
                        Ok(()) => println!("Format '{}' removed.", name),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: format add <name...>|rename <old> <new>|remove <name...>"),
            },
            "color" if !rest.is_empty() => {
                let tag = rest.join(" ");
                println!("{}: {}", tag, color_for(&tag).hex());
            }
            "export" => match (rest.first().map(String::as_str), rest.get(1)) {
                (Some("json"), Some(path)) => {
                    match planner
                        .export_snapshot()
                        .and_then(|snapshot| Ok(save_snapshot_to_json(&snapshot, path)?))
                    {
                        Ok(()) => println!("Exported to {}.", path),
                        Err(e) => println!("Error exporting: {}", e),
                    }
                }
                (Some("csv"), Some(path)) => {
                    match planner
                        .entries()
                        .and_then(|entries| Ok(save_entries_to_csv(&entries, path)?))
                    {
                        Ok(()) => println!("Exported to {}.", path),
                        Err(e) => println!("Error exporting: {}", e),
                    }
                }
                _ => println!("Usage: export <json|csv> <path>"),
            },
            "import" => {
                let imported = match (rest.first().map(String::as_str), rest.get(1)) {
                    (Some("json"), Some(path)) => load_snapshot_from_json(path)
                        .map_err(PlannerError::from)
                        .and_then(|snapshot| planner.import_snapshot(&snapshot))
                        .map(|count| (count, path)),
                    (Some("csv"), Some(path)) => load_entries_from_csv(path)
                        .map_err(PlannerError::from)
                        .and_then(|entries| planner.import_entries(&entries))
                        .map(|count| (count, path)),
                    _ => {
                        println!("Usage: import <json|csv> <path>");
                        continue;
                    }
                };
                match imported {
                    Ok((count, path)) => println!("Imported {} entries from {}.", count, path),
                    Err(e) => println!("Error importing: {}", e),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
