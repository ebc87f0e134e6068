//! # Ad Carousel
//!
//! Promotional slides rotating beside the cart. The runtime calls
//! [`AdCarousel::advance`] every `DEFAULT_AD_ROTATION_MS`.

use serde::{Deserialize, Serialize};

/// One promotional slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub image: String,
    pub title: String,
    pub description: String,
}

impl Ad {
    pub fn new(
        image: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Ad {
            image: image.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Wrapping cursor over a list of ads.
///
/// An empty carousel is allowed; `current()` is then `None`.
#[derive(Debug, Clone, Default)]
pub struct AdCarousel {
    ads: Vec<Ad>,
    index: usize,
}

impl AdCarousel {
    pub fn new(ads: Vec<Ad>) -> Self {
        AdCarousel { ads, index: 0 }
    }

    /// The slides shown by the kiosk out of the box.
    pub fn seeded() -> Self {
        AdCarousel::new(vec![
            Ad::new(
                "https://icelltech.ca/cdn/shop/files/Free_Plan_Promotion_resolution.png?v=1728484928",
                "Weekly Specials",
                "Save up to 30% on fresh produce",
            ),
            Ad::new(
                "https://icelltech.ca/cdn/shop/files/gift-cards_aece9630-6434-4083-8972-4e012c1435c6_2800x1000_crop_center.jpg?v=1729722915",
                "Members Only Deal",
                "Join our loyalty program today",
            ),
            Ad::new(
                "https://icelltech.ca/cdn/shop/files/Untitled-9.png?v=1705509729",
                "Fresh Arrivals",
                "Check out our new organic selection",
            ),
        ])
    }

    pub fn current(&self) -> Option<&Ad> {
        self.ads.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves to the next slide, wrapping to the first.
    pub fn advance(&mut self) -> Option<&Ad> {
        if self.ads.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.ads.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }
}
