//! Log command handlers.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use provena_core::{LogFilter, LogLevel, SortOrder};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, truncate_string};

/// Arguments for `log list`.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub node: Option<i64>,
    pub level: Option<LogLevel>,
    pub logger: Option<String>,
    pub since: Option<String>,
    pub limit: Option<u32>,
    pub newest_first: bool,
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
pub fn parse_time(raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| CliError::Arguments(format!("cannot parse time `{raw}`")))
}

/// List log entries matching the given options.
pub async fn list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let filter = LogFilter {
        min_level: args.level,
        logger_name: args.logger,
        node_id: args.node,
        since: args.since.as_deref().map(parse_time).transpose()?,
        order: if args.newest_first {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        },
        limit: args.limit,
        ..LogFilter::default()
    };

    let entries = ctx.backend().logs().find(&filter).await?;
    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    println!(
        "{:<26} {:<9} {:<7} {:<20} Message",
        "Time", "Level", "Node", "Logger"
    );
    print_separator(100);
    for entry in entries {
        println!(
            "{:<26} {:<9} {:<7} {:<20} {}",
            entry.time.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.level,
            entry.node_id,
            truncate_string(&entry.logger_name, 19),
            entry.message
        );
    }

    Ok(())
}

/// Delete log entries by node and/or age.
///
/// Without a node or time bound, `all` must be set.
pub async fn purge(
    ctx: &CliContext,
    node: Option<i64>,
    before: Option<&str>,
    all: bool,
) -> Result<()> {
    let logs = ctx.backend().logs();

    let removed = if node.is_none() && before.is_none() {
        if !all {
            return Err(CliError::Arguments(
                "refusing to purge every log entry without --all".to_string(),
            )
            .into());
        }
        logs.delete_all().await?
    } else {
        let filter = LogFilter {
            node_id: node,
            until: before.map(parse_time).transpose()?,
            ..LogFilter::default()
        };
        logs.delete_many(&filter).await?
    };

    println!("Removed {removed} log entr{}", if removed == 1 { "y" } else { "ies" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use chrono::TimeZone;
    use provena_core::NewLogEntry;

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("2024-05-02").unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time("2024-05-02T10:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap()
        );
        assert!(matches!(parse_time("yesterday"), Err(CliError::Arguments(_))));
    }

    #[tokio::test]
    async fn test_list_and_purge() {
        let (_db, ctx) = test_support::context().await;
        let logs = ctx.backend().logs();
        for (node, day) in [(1, 1), (1, 3), (2, 3)] {
            let time = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
            logs.create_entry(NewLogEntry::new("engine", LogLevel::Report, node, "step").at(time))
                .await
                .unwrap();
        }

        list(
            &ctx,
            ListArgs {
                level: Some(LogLevel::Info),
                newest_first: true,
                ..ListArgs::default()
            },
        )
        .await
        .unwrap();

        purge(&ctx, None, Some("2024-05-02"), false).await.unwrap();
        assert_eq!(logs.find(&LogFilter::default()).await.unwrap().len(), 2);

        purge(&ctx, Some(2), None, false).await.unwrap();
        assert_eq!(logs.logs_for_node(2).await.unwrap().len(), 0);

        let err = purge(&ctx, None, None, false).await.unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 2);
        assert_eq!(logs.find(&LogFilter::default()).await.unwrap().len(), 1);

        purge(&ctx, None, None, true).await.unwrap();
        assert!(logs.find(&LogFilter::default()).await.unwrap().is_empty());
    }
}
