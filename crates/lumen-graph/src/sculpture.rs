//! Wiring of the physical sculpture.
//!
//! 369 pixels in three runs on one data line:
//!
//! - `0..120`: primary helix, counterclockwise (`LOOP1`)
//! - `120..228`: secondary helix, counterclockwise (`LOOP2`), crossing the
//!   primary helix twice in every 18-pixel section and routing through the
//!   primary pixel at each crossing
//! - `228..369`: three spiral arms of 47 pixels each, wired from centre to
//!   rim (`SPIRAL | OUTBOUND`)
//!
//! The runs follow the data line and do not wrap: pixel 119 feeds pixel
//! 120, and the last secondary crossing (`227 -> 107`) feeds the first
//! spiral centre (`107 -> 228`). Each boundary link carries the tags of the
//! run it ends. Each spiral rim is fed from two neighbouring
//! secondary-helix pixels by `SPIRAL | INBOUND` links.

use crate::{Edge, EdgeTypes, Graph, PixelIndex, Result, TransposeTable};

pub const LED_COUNT: usize = 369;
pub const PRIMARY_HELIX_LED_COUNT: u16 = 120;
pub const SECONDARY_HELIX_LED_COUNT: u16 = 108;
pub const SPIRAL_COUNT: u16 = 3;
pub const SPIRAL_LED_COUNT: u16 = 47;

/// First secondary-helix pixel that feeds a spiral rim.
pub const SPIRAL_FIRST_ENTRANCE_INDEX: u16 = 133;
/// First pixel of the first spiral arm (its centre).
pub const SPIRAL_FIRST_INDEX: u16 = PRIMARY_HELIX_LED_COUNT + SECONDARY_HELIX_LED_COUNT;

/// Pixels per repeating section of the secondary helix.
const SECONDARY_SECTION_LEN: u16 = 18;

const _: () = assert!(
    (PRIMARY_HELIX_LED_COUNT + SECONDARY_HELIX_LED_COUNT + SPIRAL_COUNT * SPIRAL_LED_COUNT) as usize
        == LED_COUNT
);

/// The centre pixel of every spiral arm.
pub const SPIRAL_CENTERS: [PixelIndex; SPIRAL_COUNT as usize] = [
    PixelIndex(SPIRAL_FIRST_INDEX),
    PixelIndex(SPIRAL_FIRST_INDEX + SPIRAL_LED_COUNT),
    PixelIndex(SPIRAL_FIRST_INDEX + 2 * SPIRAL_LED_COUNT),
];

/// The rim pixel of spiral arm `arm`.
pub const fn spiral_rim(arm: u16) -> PixelIndex {
    PixelIndex(SPIRAL_FIRST_INDEX + (arm + 1) * SPIRAL_LED_COUNT - 1)
}

/// Whether secondary-helix pixel `px` sits just before a crossing with the
/// primary helix.
const fn precedes_crossing(px: u16) -> bool {
    let parity = px % SECONDARY_SECTION_LEN;
    parity == 3 || parity == 11
}

/// Every physical link, in wiring order.
pub fn sculpture_edges() -> Vec<Edge> {
    let mut edges = Vec::with_capacity(LED_COUNT + 32);

    let primary = EdgeTypes::LOOP1 | EdgeTypes::COUNTERCLOCKWISE;
    for i in 0..PRIMARY_HELIX_LED_COUNT {
        edges.push(Edge::new(i, i + 1, primary));
    }

    let secondary = EdgeTypes::LOOP2 | EdgeTypes::COUNTERCLOCKWISE;
    for i in PRIMARY_HELIX_LED_COUNT..SPIRAL_FIRST_INDEX {
        let next = i + 1;
        if precedes_crossing(i) {
            let crossing = i - PRIMARY_HELIX_LED_COUNT;
            edges.push(Edge::new(i, crossing, secondary));
            edges.push(Edge::new(crossing, next, secondary));
        } else {
            edges.push(Edge::new(i, next, secondary));
        }
    }

    let arm = EdgeTypes::SPIRAL | EdgeTypes::OUTBOUND;
    let feed = EdgeTypes::SPIRAL | EdgeTypes::INBOUND;
    for s in 0..SPIRAL_COUNT {
        let centre = SPIRAL_FIRST_INDEX + s * SPIRAL_LED_COUNT;
        for px in centre..centre + SPIRAL_LED_COUNT - 1 {
            edges.push(Edge::new(px, px + 1, arm));
        }

        // Arms are fed in reverse: the first entrance feeds the last arm.
        let exit = SPIRAL_FIRST_ENTRANCE_INDEX + s * SECONDARY_HELIX_LED_COUNT / SPIRAL_COUNT;
        let rim = spiral_rim(SPIRAL_COUNT - 1 - s);
        edges.push(Edge::new(exit, rim.value(), feed));
        edges.push(Edge::new(exit + 1, rim.value(), feed));
    }

    edges
}

/// Build the sculpture graph with the standard transpose table.
pub fn sculpture_graph() -> Result<Graph> {
    Graph::build(&sculpture_edges(), LED_COUNT, TransposeTable::STANDARD)
}
