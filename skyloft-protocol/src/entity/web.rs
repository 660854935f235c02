//! Web entity block

use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_SOURCE_URL: PropertyIndex = derived(0);
pub const PROP_DPI: PropertyIndex = derived(1);
pub const PROP_SCRIPT_URL: PropertyIndex = derived(2);
pub const PROP_MAX_FPS: PropertyIndex = derived(3);
pub const PROP_INPUT_MODE: PropertyIndex = derived(4);
pub const PROP_SHOW_KEYBOARD_FOCUS_HIGHLIGHT: PropertyIndex = derived(5);
pub const PROP_WEB_USE_BACKGROUND: PropertyIndex = derived(6);
pub const PROP_USER_AGENT: PropertyIndex = derived(7);

/// Properties specific to web entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebProperties {
    pub source_url: Option<String>,
    pub dpi: Option<u16>,
    pub script_url: Option<String>,
    pub max_fps: Option<u8>,
    pub input_mode: Option<u32>,
    pub show_keyboard_focus_highlight: Option<bool>,
    pub use_background: Option<bool>,
    pub user_agent: Option<String>,
}

impl WebProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_SOURCE_URL, self.source_url);
        mark_changed!(flags, PROP_DPI, self.dpi);
        mark_changed!(flags, PROP_SCRIPT_URL, self.script_url);
        mark_changed!(flags, PROP_MAX_FPS, self.max_fps);
        mark_changed!(flags, PROP_INPUT_MODE, self.input_mode);
        mark_changed!(flags, PROP_SHOW_KEYBOARD_FOCUS_HIGHLIGHT, self.show_keyboard_focus_highlight);
        mark_changed!(flags, PROP_WEB_USE_BACKGROUND, self.use_background);
        mark_changed!(flags, PROP_USER_AGENT, self.user_agent);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_SOURCE_URL, self.source_url, append_string_value);
        append_property!(copy data, ctx, PROP_DPI, self.dpi, append_u16_value);
        append_property!(ref data, ctx, PROP_SCRIPT_URL, self.script_url, append_string_value);
        append_property!(copy data, ctx, PROP_MAX_FPS, self.max_fps, append_u8_value);
        append_property!(copy data, ctx, PROP_INPUT_MODE, self.input_mode, append_u32_value);
        append_property!(copy data, ctx, PROP_SHOW_KEYBOARD_FOCUS_HIGHLIGHT, self.show_keyboard_focus_highlight, append_bool_value);
        append_property!(copy data, ctx, PROP_WEB_USE_BACKGROUND, self.use_background, append_bool_value);
        append_property!(ref data, ctx, PROP_USER_AGENT, self.user_agent, append_string_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_SOURCE_URL, block.source_url, read_string);
        read_property!(reader, flags, PROP_DPI, block.dpi, read_u16_le);
        read_property!(reader, flags, PROP_SCRIPT_URL, block.script_url, read_string);
        read_property!(reader, flags, PROP_MAX_FPS, block.max_fps, read_u8);
        read_property!(reader, flags, PROP_INPUT_MODE, block.input_mode, read_u32_le);
        read_property!(reader, flags, PROP_SHOW_KEYBOARD_FOCUS_HIGHLIGHT, block.show_keyboard_focus_highlight, read_bool);
        read_property!(reader, flags, PROP_WEB_USE_BACKGROUND, block.use_background, read_bool);
        read_property!(reader, flags, PROP_USER_AGENT, block.user_agent, read_string);
        Ok(block)
    }
}
