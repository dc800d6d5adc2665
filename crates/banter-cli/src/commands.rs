//! Command handlers.
//!
//! Each command is an independent handler function of the bot state and
//! its raw arguments, registered in a lookup table keyed by command
//! name. The registry drives dispatch, `help`, and `about`.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use banter_core::{Answer, AskEngine, BanterResult, BotConfig, PrefStore};
use chrono::Utc;
use indexmap::IndexMap;

use crate::source::FileWorkbook;
use crate::tokens;

/// Pref key guarding forced cache refreshes.
pub const REFRESH_COOLDOWN_KEY: &str = "refresh_ask_cd";

/// Live bot state shared by every handler.
pub struct Bot {
    pub config: BotConfig,
    pub engine: AskEngine<FileWorkbook>,
    pub prefs: PrefStore,
}

impl Bot {
    /// Build bot state from configuration, loading saved preferences.
    pub fn new(config: BotConfig) -> BanterResult<Self> {
        let prefs = PrefStore::load(&config.prefs_path)?;
        let engine = AskEngine::new(
            FileWorkbook::new(config.data_dir.clone()),
            config.workbook.clone(),
        );
        Ok(Self {
            config,
            engine,
            prefs,
        })
    }
}

/// A command handler: bot state plus raw arguments in, reply text out.
pub type Handler = fn(&mut Bot, &[String]) -> Result<String>;

/// One registered command.
pub struct Command {
    pub usage: &'static str,
    pub description: &'static str,
    pub run: Handler,
}

/// Build the command registry. Insertion order is the display order of
/// `help` and `about`.
pub fn registry() -> IndexMap<&'static str, Command> {
    let mut commands: IndexMap<&'static str, Command> = IndexMap::new();
    let mut register = |name, usage, description, run| {
        commands.insert(
            name,
            Command {
                usage,
                description,
                run,
            },
        );
    };

    register("hello", "hello", "Say hello to the bot", hello);
    register("about", "about", "Show bot info and available commands", about);
    register(
        "help",
        "help [command]",
        "Show help for all commands or one command",
        help,
    );
    register(
        "ask",
        "ask <question> [--user NAME] [--role ROLE]...",
        "Ask the bot a question",
        ask,
    );
    register(
        "refresh-ask",
        "refresh-ask <table|all>",
        "Force-reload cached ask tables",
        refresh_ask,
    );
    register(
        "show-ask-cache",
        "show-ask-cache <table>",
        "Display one cached ask table",
        show_ask_cache,
    );
    register("claim", "claim <user>", "Claim tokens on a cooldown", claim);
    register(
        "balance",
        "balance <user>",
        "Show a user's token balance",
        balance,
    );
    register(
        "spend",
        "spend <user> <target> <claim|refresh> <tokens> <extend|reduce>",
        "Spend tokens to modify a cooldown",
        spend,
    );
    register(
        "save-db",
        "save-db",
        "Save current preferences to disk",
        save_db,
    );
    register(
        "load-db",
        "load-db",
        "Reload preferences from disk (manual override)",
        load_db,
    );
    commands
}

/// Render seconds as "1h 2m 3s", skipping leading zero parts.
fn fmt_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn hello(bot: &mut Bot, _args: &[String]) -> Result<String> {
    Ok(format!("{} is ready and listening!", bot.config.bot_name))
}

fn about(bot: &mut Bot, _args: &[String]) -> Result<String> {
    let mut out = format!("Bot name: {}\nCommands:\n", bot.config.bot_name);
    for (name, command) in registry() {
        writeln!(out, "- {name}: {}", command.description)?;
    }
    Ok(out)
}

fn help(_bot: &mut Bot, args: &[String]) -> Result<String> {
    let commands = registry();
    match args.first() {
        Some(name) => {
            let command = commands
                .get(name.as_str())
                .with_context(|| format!("command '{name}' not found"))?;
            Ok(format!(
                "{name}\n  usage: {}\n  {}",
                command.usage, command.description
            ))
        }
        None => {
            let mut out = String::from("Available commands:\n");
            for command in commands.values() {
                writeln!(out, "- {}: {}", command.usage, command.description)?;
            }
            Ok(out)
        }
    }
}

fn ask(bot: &mut Bot, args: &[String]) -> Result<String> {
    let mut user = "friend".to_string();
    let mut roles: Vec<String> = Vec::new();
    let mut words: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => user = iter.next().context("--user needs a value")?.clone(),
            "--role" => roles.push(iter.next().context("--role needs a value")?.clone()),
            word => words.push(word),
        }
    }
    let question = words.join(" ");
    if question.is_empty() {
        bail!("usage: ask <question> [--user NAME] [--role ROLE]");
    }

    match bot.engine.respond(&question, &user, &roles, Utc::now())? {
        Answer::Reply(reply) => Ok(format!(
            "{user} asks: {question}\n{} says: {reply}",
            bot.config.bot_name
        )),
        Answer::Unavailable => Ok(
            "I couldn't load my response data. Try `refresh-ask all` or check the workbook."
                .to_string(),
        ),
    }
}

fn refresh_ask(bot: &mut Bot, args: &[String]) -> Result<String> {
    let name = args.first().context("usage: refresh-ask <table|all>")?;

    let remaining = bot.prefs.get(REFRESH_COOLDOWN_KEY, 0.0);
    if remaining > 0.0 {
        return Ok(format!(
            "A refresh was done recently. Try again in {}.",
            fmt_duration(remaining.ceil() as u64)
        ));
    }

    let refreshed = bot.engine.refresh(name)?;
    bot.prefs
        .set_time_based(REFRESH_COOLDOWN_KEY, bot.config.refresh_cooldown_secs as f64);
    Ok(format!("Refreshed: {}", refreshed.join(", ")))
}

fn show_ask_cache(bot: &mut Bot, args: &[String]) -> Result<String> {
    let name = args.first().context("usage: show-ask-cache <table>")?;
    let table = bot.engine.cache_snapshot(name)?;
    if table.is_empty() {
        return Ok(format!("{name}: empty"));
    }

    let mut out = format!("{name} ({} rows):\n", table.len());
    for (key, values) in &table {
        writeln!(out, "  {key} -> {}", values.join(" | "))?;
    }
    Ok(out)
}

fn claim(bot: &mut Bot, args: &[String]) -> Result<String> {
    let user = args.first().context("usage: claim <user>")?;

    let remaining = tokens::claim_remaining(&bot.prefs, user);
    if remaining > 0 {
        return Ok(format!(
            "You must wait {} before claiming again.",
            fmt_duration(remaining as u64)
        ));
    }

    let new_balance = tokens::balance(&bot.prefs, user) + tokens::CLAIM_AWARD;
    tokens::set_balance(&mut bot.prefs, user, new_balance);
    tokens::start_claim_cooldown(&mut bot.prefs, user, bot.config.claim_cooldown_secs);

    Ok(format!(
        "Claimed {} tokens. New balance for {user}: {new_balance}",
        tokens::CLAIM_AWARD
    ))
}

fn balance(bot: &mut Bot, args: &[String]) -> Result<String> {
    let user = args.first().context("usage: balance <user>")?;
    Ok(format!(
        "{user} has {} tokens.",
        tokens::balance(&bot.prefs, user)
    ))
}

fn spend(bot: &mut Bot, args: &[String]) -> Result<String> {
    let [user, target, kind, amount, mode] = args else {
        bail!("usage: spend <user> <target> <claim|refresh> <tokens> <extend|reduce>");
    };
    let amount: i64 = amount.parse().context("token amount must be a number")?;
    if amount < 1 {
        bail!("token amount must be at least 1");
    }

    let current_balance = tokens::balance(&bot.prefs, user);
    if current_balance < amount {
        return Ok(format!(
            "{user} only has {current_balance} tokens, but that requires {amount}."
        ));
    }

    let mut delta = amount * tokens::SECONDS_PER_TOKEN;
    let verb = match mode.as_str() {
        "extend" => "extended",
        "reduce" => {
            delta = -delta;
            "reduced"
        }
        other => bail!("unknown mode '{other}', expected extend or reduce"),
    };

    if !tokens::adjust_cooldown(&mut bot.prefs, kind, target, delta) {
        bail!("unknown cooldown '{kind}', expected claim or refresh");
    }
    tokens::set_balance(&mut bot.prefs, user, current_balance - amount);

    Ok(format!(
        "{user} has {verb} {target}'s {kind} cooldown by {}s. Remaining balance: {}",
        delta.abs(),
        current_balance - amount
    ))
}

fn save_db(bot: &mut Bot, _args: &[String]) -> Result<String> {
    if let Some(parent) = bot.config.prefs_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    bot.prefs.save(&bot.config.prefs_path)?;
    Ok(format!(
        "Preferences saved to {}.",
        bot.config.prefs_path.display()
    ))
}

fn load_db(bot: &mut Bot, _args: &[String]) -> Result<String> {
    bot.prefs = PrefStore::load(&bot.config.prefs_path)?;
    Ok(format!(
        "Preferences loaded from {}.",
        bot.config.prefs_path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bot() -> (tempfile::TempDir, Bot) {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig::builder()
            .bot_name("Testbot")
            .workbook("wb")
            .data_dir(dir.path().join("data"))
            .prefs_path(dir.path().join("prefs.json"))
            .refresh_cooldown_secs(120)
            .build();
        let bot = Bot::new(config).unwrap();
        (dir, bot)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registry_contains_every_command() {
        let commands = registry();
        for name in [
            "hello",
            "about",
            "help",
            "ask",
            "refresh-ask",
            "show-ask-cache",
            "claim",
            "balance",
            "spend",
            "save-db",
            "load-db",
        ] {
            assert!(commands.contains_key(name), "missing command {name}");
        }
    }

    #[test]
    fn test_fmt_duration() {
        assert_eq!(fmt_duration(59), "59s");
        assert_eq!(fmt_duration(125), "2m 5s");
        assert_eq!(fmt_duration(3725), "1h 2m 5s");
    }

    #[test]
    fn test_ask_without_data_reports_unavailable() {
        let (_dir, mut bot) = test_bot();
        let reply = ask(&mut bot, &args(&["when", "will", "i", "sleep"])).unwrap();
        assert!(reply.contains("refresh-ask"));
    }

    #[test]
    fn test_ask_requires_a_question() {
        let (_dir, mut bot) = test_bot();
        assert!(ask(&mut bot, &args(&["--user", "mocha"])).is_err());
    }

    #[test]
    fn test_refresh_sets_cooldown() {
        let (_dir, mut bot) = test_bot();

        let first = refresh_ask(&mut bot, &args(&["all"])).unwrap();
        assert!(first.starts_with("Refreshed:"));

        // Second refresh inside the window is rejected with a countdown.
        let second = refresh_ask(&mut bot, &args(&["all"])).unwrap();
        assert!(second.contains("Try again in"));
    }

    #[test]
    fn test_claim_then_wait() {
        let (_dir, mut bot) = test_bot();

        let first = claim(&mut bot, &args(&["mocha"])).unwrap();
        assert!(first.contains("New balance for mocha: 3600"));

        let second = claim(&mut bot, &args(&["mocha"])).unwrap();
        assert!(second.contains("wait"));

        let shown = balance(&mut bot, &args(&["mocha"])).unwrap();
        assert!(shown.contains("3600"));
    }

    #[test]
    fn test_spend_reduces_cooldown_and_balance() {
        let (_dir, mut bot) = test_bot();
        claim(&mut bot, &args(&["mocha"])).unwrap();

        let reply = spend(
            &mut bot,
            &args(&["mocha", "mocha", "claim", "600", "reduce"]),
        )
        .unwrap();
        assert!(reply.contains("reduced"));
        assert_eq!(tokens::balance(&bot.prefs, "mocha"), 3000);
        assert!(tokens::claim_remaining(&bot.prefs, "mocha") < 3001);
    }

    #[test]
    fn test_spend_rejects_overdraft_and_unknown_kind() {
        let (_dir, mut bot) = test_bot();
        let reply = spend(&mut bot, &args(&["mocha", "mocha", "claim", "5", "reduce"])).unwrap();
        assert!(reply.contains("only has 0 tokens"));

        claim(&mut bot, &args(&["mocha"])).unwrap();
        assert!(spend(&mut bot, &args(&["mocha", "mocha", "daily", "5", "reduce"])).is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, mut bot) = test_bot();
        claim(&mut bot, &args(&["mocha"])).unwrap();
        save_db(&mut bot, &[]).unwrap();

        tokens::set_balance(&mut bot.prefs, "mocha", 1);
        load_db(&mut bot, &[]).unwrap();
        assert_eq!(tokens::balance(&bot.prefs, "mocha"), 3600);
    }
}
