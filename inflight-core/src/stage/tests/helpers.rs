use crate::error::Result;
use crate::event::{EVENT_TYPE, EventKind, ORDINAL, UNIX};
use crate::record::REQUEST_ID;
use crate::row::{Header, Row};
use crate::stage::Stage;
use crate::stream::unbounded_link;

/// Feeds `rows` through `stage` and collects what it writes.
pub fn run_stage(
    stage: &mut impl Stage,
    header: Header,
    rows: Vec<Row>,
) -> Result<(Header, Vec<Row>)> {
    let (mut feed, mut input) = unbounded_link("test", stage.name());
    let (mut output, mut drain) = unbounded_link(stage.name(), "test");

    feed.open(header)?;
    for row in rows {
        feed.write(row)?;
    }
    drop(feed);

    stage.run(&mut input, &mut output)?;
    drop(output);

    let header = drain.header()?;
    let mut out = Vec::new();
    while let Some(row) = drain.next_row()? {
        out.push(row);
    }
    Ok((header, out))
}

pub fn event_header() -> Header {
    Header::new([REQUEST_ID, ORDINAL, UNIX, EVENT_TYPE])
}

pub fn event(id: &str, ordinal: u64, unix: i64, kind: EventKind) -> Row {
    Row::from_iter([
        (REQUEST_ID, id.to_string()),
        (ORDINAL, ordinal.to_string()),
        (UNIX, unix.to_string()),
        (EVENT_TYPE, kind.as_str().to_string()),
    ])
}

pub fn column<'a>(rows: &'a [Row], field: &str) -> Vec<&'a str> {
    rows.iter().map(|r| r.get(field)).collect()
}
