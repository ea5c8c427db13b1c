use alloy::dyn_abi::DynSolValue;
use std::io::Write;

use crate::error::FetchResult;
use crate::ethereum::EventEntry;

/// Render a decoded Solidity value for display.
pub fn render_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Uint(num, _) => num.to_string(),
        DynSolValue::Int(num, _) => num.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", hex::encode(&word[..(*size).min(32)]))
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        other => format!("{:?}", other),
    }
}

/// Format one entry as its four report lines plus the trailing blank line.
pub fn render_entry(entry: &EventEntry) -> String {
    let args: Vec<String> = entry
        .args
        .iter()
        .map(|(name, value)| format!("{}: {}", name, render_value(value)))
        .collect();

    format!(
        "Event: {}\nArgs: {{{}}}\nTransaction Hash: 0x{:x}\nBlock Number: {}\n\n",
        entry.event,
        args.join(", "),
        entry.transaction_hash,
        entry.block_number
    )
}

/// Write every entry to `out` in the order given.
pub fn write_entries<W: Write>(out: &mut W, entries: &[EventEntry]) -> FetchResult<()> {
    for entry in entries {
        tracing::debug!(
            "Reporting {} from block {} (log index {:?})",
            entry.event,
            entry.block_number,
            entry.log_index
        );
        out.write_all(render_entry(entry).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
