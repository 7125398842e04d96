use super::model::TrackModel;
use super::{
    CARD_GAP, CARD_RADIUS, DOT_RADIUS, DOT_SPACING, IMAGE_HEIGHT, ORDER_PILL_HEIGHT, PADDING,
};
use crate::catalog::{Product, format_price};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

/// Rectangle of one card, in track-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CardRect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl CardRect {
    fn at(index: usize, offset: f64, card_width: f64, height: f64) -> Self {
        Self {
            x: offset + index as f64 * (card_width + CARD_GAP),
            y: 0.0,
            w: card_width,
            h: height,
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    fn order_pill(&self) -> CardRect {
        CardRect {
            x: self.x + PADDING,
            y: self.y + self.h - PADDING - ORDER_PILL_HEIGHT,
            w: self.w - 2.0 * PADDING,
            h: ORDER_PILL_HEIGHT,
        }
    }

    fn visible_in(&self, width: f64) -> bool {
        self.x + self.w > 0.0 && self.x < width
    }
}

/// What a pointer position on the track lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Gap,
    Card(usize),
    /// The "Order" pill of a card; behaves like a link.
    Order(usize),
}

pub fn hit_test(
    offset: f64,
    card_width: f64,
    height: f64,
    items: usize,
    x: f64,
    y: f64,
) -> HitTarget {
    let step = card_width + CARD_GAP;
    if step <= 0.0 {
        return HitTarget::Gap;
    }
    let index = ((x - offset) / step).floor();
    if index < 0.0 || index as usize >= items {
        return HitTarget::Gap;
    }

    let index = index as usize;
    let rect = CardRect::at(index, offset, card_width, height);
    if rect.order_pill().contains(x, y) {
        HitTarget::Order(index)
    } else if rect.contains(x, y) {
        HitTarget::Card(index)
    } else {
        HitTarget::Gap
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded_rect(cr: &Context, rect: &CardRect, radius: f64) {
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0);
    cr.new_sub_path();
    cr.arc(rect.x + rect.w - r, rect.y + r, r, -PI / 2.0, 0.0);
    cr.arc(rect.x + rect.w - r, rect.y + rect.h - r, r, 0.0, PI / 2.0);
    cr.arc(rect.x + r, rect.y + rect.h - r, r, PI / 2.0, PI);
    cr.arc(rect.x + r, rect.y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

struct CardRenderer<'a> {
    product: &'a Product,
    pixbuf: Option<&'a Pixbuf>,
    rect: CardRect,
}

impl<'a> CardRenderer<'a> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.card);
        rounded_rect(cr, &self.rect, CARD_RADIUS);
        cr.fill()?;

        self.draw_image(cr, colors)?;
        self.draw_text(cr, colors)?;
        self.draw_order_pill(cr, colors)?;
        if self.product.has_discount() {
            self.draw_badge(cr, colors)?;
        }
        Ok(())
    }

    fn image_rect(&self) -> CardRect {
        CardRect {
            x: self.rect.x,
            y: self.rect.y,
            w: self.rect.w,
            h: IMAGE_HEIGHT,
        }
    }

    fn draw_image(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let area = self.image_rect();
        cr.save()?;
        rounded_rect(cr, &area, CARD_RADIUS);
        cr.clip();

        match self.pixbuf {
            Some(pixbuf) => {
                // cover the image area, centered
                let scale = (area.w / pixbuf.width() as f64).max(area.h / pixbuf.height() as f64);
                let (iw, ih) = (
                    pixbuf.width() as f64 * scale,
                    pixbuf.height() as f64 * scale,
                );
                cr.translate(area.x + (area.w - iw) / 2.0, area.y + (area.h - ih) / 2.0);
                cr.scale(scale, scale);
                cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
                cr.paint()?;
            }
            None => {
                set_color(cr, colors.placeholder);
                cr.paint()?;
                set_color(cr, colors.muted);
                cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
                cr.set_font_size(28.0);
                let initial = self.product.name.chars().next().unwrap_or('?').to_string();
                if let Ok(ext) = cr.text_extents(&initial) {
                    cr.move_to(
                        area.x + (area.w - ext.width()) / 2.0,
                        area.y + (area.h + ext.height()) / 2.0,
                    );
                    cr.show_text(&initial)?;
                }
            }
        }
        cr.restore()
    }

    fn draw_text(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let x = self.rect.x + PADDING;
        let mut y = self.rect.y + IMAGE_HEIGHT + PADDING + 16.0;

        cr.save()?;
        cr.rectangle(self.rect.x, self.rect.y, self.rect.w - PADDING, self.rect.h);
        cr.clip();

        set_color(cr, colors.text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(15.0);
        cr.move_to(x, y);
        cr.show_text(&self.product.name)?;

        y += 24.0;
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(14.0);
        if self.product.has_discount() {
            let original = format_price(self.product.original_price());
            set_color(cr, colors.muted);
            cr.move_to(x, y);
            cr.show_text(&original)?;
            if let Ok(ext) = cr.text_extents(&original) {
                // strike-through
                cr.set_line_width(1.0);
                cr.move_to(x, y - ext.height() / 3.0);
                cr.line_to(x + ext.x_advance(), y - ext.height() / 3.0);
                cr.stroke()?;
                cr.move_to(x + ext.x_advance() + 8.0, y);
            }
            set_color(cr, colors.accent);
            cr.show_text(&format_price(self.product.discounted_price()))?;
        } else {
            set_color(cr, colors.text);
            cr.move_to(x, y);
            cr.show_text(&format_price(self.product.price))?;
        }
        cr.restore()
    }

    fn draw_order_pill(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let pill = self.rect.order_pill();
        set_color(cr, colors.accent);
        rounded_rect(cr, &pill, pill.h / 2.0);
        cr.fill()?;

        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(13.0);
        let label = "Order";
        if let Ok(ext) = cr.text_extents(label) {
            cr.move_to(
                pill.x + (pill.w - ext.width()) / 2.0,
                pill.y + (pill.h + ext.height()) / 2.0,
            );
            cr.show_text(label)?;
        }
        Ok(())
    }

    fn draw_badge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let badge = CardRect {
            x: self.rect.x + PADDING,
            y: self.rect.y + PADDING,
            w: 52.0,
            h: 24.0,
        };
        set_color(cr, colors.accent);
        rounded_rect(cr, &badge, 6.0);
        cr.fill()?;

        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.set_font_size(12.0);
        let label = format!("-{}%", self.product.discount);
        if let Ok(ext) = cr.text_extents(&label) {
            cr.move_to(
                badge.x + (badge.w - ext.width()) / 2.0,
                badge.y + (badge.h + ext.height()) / 2.0,
            );
            cr.show_text(&label)?;
        }
        Ok(())
    }
}

pub fn draw(
    cr: &Context,
    model: &TrackModel,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let card_width = model.layout().card_width();
    let offset = model.motion.displayed();

    if model.products.is_empty() {
        set_color(cr, colors.muted);
        cr.set_font_size(14.0);
        cr.move_to(PADDING, height / 2.0);
        cr.show_text("No products in this category yet")?;
        return Ok(());
    }

    for (i, (product, pixbuf)) in model.products.iter().zip(&model.pixbufs).enumerate() {
        let rect = CardRect::at(i, offset, card_width, height);
        if !rect.visible_in(width) {
            continue;
        }
        CardRenderer {
            product,
            pixbuf: pixbuf.as_ref(),
            rect,
        }
        .draw(cr, colors)?;
    }
    Ok(())
}

fn dots_origin(width: f64, count: usize) -> f64 {
    let span = count.saturating_sub(1) as f64 * DOT_SPACING;
    (width - span) / 2.0
}

/// Index of the dot under `x`, if any.
pub fn dot_at(width: f64, count: usize, x: f64) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let rel = (x - dots_origin(width, count)) / DOT_SPACING;
    let index = rel.round();
    let within = (rel - index).abs() * DOT_SPACING <= DOT_RADIUS * 1.5;
    (within && index >= 0.0 && (index as usize) < count).then_some(index as usize)
}

pub fn draw_dots(
    cr: &Context,
    dots: &[bool],
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let origin = dots_origin(width, dots.len());
    for (i, &active) in dots.iter().enumerate() {
        set_color(cr, if active { colors.accent } else { colors.muted });
        let radius = if active { DOT_RADIUS * 1.3 } else { DOT_RADIUS };
        cr.arc(
            origin + i as f64 * DOT_SPACING,
            height / 2.0,
            radius,
            0.0,
            2.0 * PI,
        );
        cr.fill()?;
    }
    Ok(())
}
