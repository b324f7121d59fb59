use crate::error::{NexusError, Result};
use crate::models::TradeSetup;

/// Decode the JSON body that follows the trade-setup marker.
///
/// A surrounding markdown code fence is tolerated, as is trailing prose after
/// a complete object. Anything else that is not a well-formed setup is an
/// error; the extractor turns that into absence.
pub fn decode_trade_setup(body: &str) -> Result<TradeSetup> {
    let json = strip_code_fence(body.trim());

    let setup = serde_json::Deserializer::from_str(json)
        .into_iter::<TradeSetup>()
        .next()
        .ok_or(NexusError::EmptyResponse)??;

    if !setup.confidence_in_range() {
        return Err(NexusError::InvalidSetup(format!(
            "confidence {} outside 0-100",
            setup.confidence_score
        )));
    }

    Ok(setup)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
