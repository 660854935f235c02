//! Text entity block

use skyloft_support::math::Color;
use skyloft_support::octree_packet_data::{OctreePacketData, PacketContext};
use skyloft_support::property_flags::PropertyFlags;
use skyloft_support::reader::PacketDataReader;

use crate::entity::property_list::{derived, PropertyIndex};
use crate::entity::{append_property, mark_changed, read_property};
use crate::error::Result;

pub const PROP_TEXT: PropertyIndex = derived(0);
pub const PROP_LINE_HEIGHT: PropertyIndex = derived(1);
pub const PROP_TEXT_COLOR: PropertyIndex = derived(2);
pub const PROP_TEXT_ALPHA: PropertyIndex = derived(3);
pub const PROP_BACKGROUND_COLOR: PropertyIndex = derived(4);
pub const PROP_BACKGROUND_ALPHA: PropertyIndex = derived(5);
pub const PROP_LEFT_MARGIN: PropertyIndex = derived(6);
pub const PROP_RIGHT_MARGIN: PropertyIndex = derived(7);
pub const PROP_TOP_MARGIN: PropertyIndex = derived(8);
pub const PROP_BOTTOM_MARGIN: PropertyIndex = derived(9);
pub const PROP_UNLIT: PropertyIndex = derived(10);
pub const PROP_FONT: PropertyIndex = derived(11);
pub const PROP_TEXT_EFFECT: PropertyIndex = derived(12);
pub const PROP_TEXT_EFFECT_COLOR: PropertyIndex = derived(13);
pub const PROP_TEXT_EFFECT_THICKNESS: PropertyIndex = derived(14);
pub const PROP_TEXT_ALIGNMENT: PropertyIndex = derived(15);

/// Properties specific to text entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProperties {
    pub text: Option<String>,
    pub line_height: Option<f32>,
    pub text_color: Option<Color>,
    pub text_alpha: Option<f32>,
    pub background_color: Option<Color>,
    pub background_alpha: Option<f32>,
    pub left_margin: Option<f32>,
    pub right_margin: Option<f32>,
    pub top_margin: Option<f32>,
    pub bottom_margin: Option<f32>,
    pub unlit: Option<bool>,
    pub font: Option<String>,
    pub text_effect: Option<String>,
    pub text_effect_color: Option<Color>,
    pub text_effect_thickness: Option<f32>,
    pub alignment: Option<u32>,
}

impl TextProperties {
    pub(crate) fn mark_changed(&self, flags: &mut PropertyFlags) {
        mark_changed!(flags, PROP_TEXT, self.text);
        mark_changed!(flags, PROP_LINE_HEIGHT, self.line_height);
        mark_changed!(flags, PROP_TEXT_COLOR, self.text_color);
        mark_changed!(flags, PROP_TEXT_ALPHA, self.text_alpha);
        mark_changed!(flags, PROP_BACKGROUND_COLOR, self.background_color);
        mark_changed!(flags, PROP_BACKGROUND_ALPHA, self.background_alpha);
        mark_changed!(flags, PROP_LEFT_MARGIN, self.left_margin);
        mark_changed!(flags, PROP_RIGHT_MARGIN, self.right_margin);
        mark_changed!(flags, PROP_TOP_MARGIN, self.top_margin);
        mark_changed!(flags, PROP_BOTTOM_MARGIN, self.bottom_margin);
        mark_changed!(flags, PROP_UNLIT, self.unlit);
        mark_changed!(flags, PROP_FONT, self.font);
        mark_changed!(flags, PROP_TEXT_EFFECT, self.text_effect);
        mark_changed!(flags, PROP_TEXT_EFFECT_COLOR, self.text_effect_color);
        mark_changed!(flags, PROP_TEXT_EFFECT_THICKNESS, self.text_effect_thickness);
        mark_changed!(flags, PROP_TEXT_ALIGNMENT, self.alignment);
    }

    pub(crate) fn append(&self, data: &mut OctreePacketData, ctx: &mut PacketContext) {
        append_property!(ref data, ctx, PROP_TEXT, self.text, append_string_value);
        append_property!(copy data, ctx, PROP_LINE_HEIGHT, self.line_height, append_f32_value);
        append_property!(ref data, ctx, PROP_TEXT_COLOR, self.text_color, append_color_value);
        append_property!(copy data, ctx, PROP_TEXT_ALPHA, self.text_alpha, append_f32_value);
        append_property!(ref data, ctx, PROP_BACKGROUND_COLOR, self.background_color, append_color_value);
        append_property!(copy data, ctx, PROP_BACKGROUND_ALPHA, self.background_alpha, append_f32_value);
        append_property!(copy data, ctx, PROP_LEFT_MARGIN, self.left_margin, append_f32_value);
        append_property!(copy data, ctx, PROP_RIGHT_MARGIN, self.right_margin, append_f32_value);
        append_property!(copy data, ctx, PROP_TOP_MARGIN, self.top_margin, append_f32_value);
        append_property!(copy data, ctx, PROP_BOTTOM_MARGIN, self.bottom_margin, append_f32_value);
        append_property!(copy data, ctx, PROP_UNLIT, self.unlit, append_bool_value);
        append_property!(ref data, ctx, PROP_FONT, self.font, append_string_value);
        append_property!(ref data, ctx, PROP_TEXT_EFFECT, self.text_effect, append_string_value);
        append_property!(ref data, ctx, PROP_TEXT_EFFECT_COLOR, self.text_effect_color, append_color_value);
        append_property!(copy data, ctx, PROP_TEXT_EFFECT_THICKNESS, self.text_effect_thickness, append_f32_value);
        append_property!(copy data, ctx, PROP_TEXT_ALIGNMENT, self.alignment, append_u32_value);
    }

    pub(crate) fn read(reader: &mut PacketDataReader, flags: &PropertyFlags) -> Result<Self> {
        let mut block = Self::default();
        read_property!(reader, flags, PROP_TEXT, block.text, read_string);
        read_property!(reader, flags, PROP_LINE_HEIGHT, block.line_height, read_f32_le);
        read_property!(reader, flags, PROP_TEXT_COLOR, block.text_color, read_color);
        read_property!(reader, flags, PROP_TEXT_ALPHA, block.text_alpha, read_f32_le);
        read_property!(reader, flags, PROP_BACKGROUND_COLOR, block.background_color, read_color);
        read_property!(reader, flags, PROP_BACKGROUND_ALPHA, block.background_alpha, read_f32_le);
        read_property!(reader, flags, PROP_LEFT_MARGIN, block.left_margin, read_f32_le);
        read_property!(reader, flags, PROP_RIGHT_MARGIN, block.right_margin, read_f32_le);
        read_property!(reader, flags, PROP_TOP_MARGIN, block.top_margin, read_f32_le);
        read_property!(reader, flags, PROP_BOTTOM_MARGIN, block.bottom_margin, read_f32_le);
        read_property!(reader, flags, PROP_UNLIT, block.unlit, read_bool);
        read_property!(reader, flags, PROP_FONT, block.font, read_string);
        read_property!(reader, flags, PROP_TEXT_EFFECT, block.text_effect, read_string);
        read_property!(reader, flags, PROP_TEXT_EFFECT_COLOR, block.text_effect_color, read_color);
        read_property!(reader, flags, PROP_TEXT_EFFECT_THICKNESS, block.text_effect_thickness, read_f32_le);
        read_property!(reader, flags, PROP_TEXT_ALIGNMENT, block.alignment, read_u32_le);
        Ok(block)
    }
}
