// Author: Dustin Pilgrim
// License: MIT

use smithay_client_toolkit::output::OutputState;
use wayland_client::protocol::wl_output;

/// Logical geometry of one output, as reported through xdg-output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub name: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// All known outputs with their geometry, sorted by position.
pub fn list_outputs(state: &OutputState) -> Vec<(wl_output::WlOutput, OutputInfo)> {
    let mut outputs: Vec<_> = state
        .outputs()
        .filter_map(|output| {
            let info = state.info(&output)?;
            let pos = info.logical_position.unwrap_or((0, 0));
            let size = info.logical_size.unwrap_or((0, 0));
            let out = OutputInfo {
                name: info.name.clone(),
                x: pos.0,
                y: pos.1,
                width: size.0,
                height: size.1,
            };
            Some((output, out))
        })
        .collect();

    outputs.sort_by_key(|(_, info)| (info.y, info.x));
    outputs
}

/// Index of the output named `wanted`, or the first one.
pub fn choose(outputs: &[OutputInfo], wanted: Option<&str>) -> Option<usize> {
    match wanted {
        Some(name) => outputs
            .iter()
            .position(|o| o.name.as_deref() == Some(name)),
        None => (!outputs.is_empty()).then_some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(name: &str, x: i32) -> OutputInfo {
        OutputInfo {
            name: Some(name.into()),
            x,
            y: 0,
            width: 1920,
            height: 1080,
        }
    }

    #[test]
    fn picks_named_or_first() {
        let outs = [out("DP-1", 0), out("HDMI-A-1", 1920)];
        assert_eq!(choose(&outs, None), Some(0));
        assert_eq!(choose(&outs, Some("HDMI-A-1")), Some(1));
        assert_eq!(choose(&outs, Some("eDP-1")), None);
        assert_eq!(choose(&[], None), None);
    }
}
