//! Static theme catalog.
//!
//! Every theme the booth offers is defined here at build time. The relay
//! never reads this catalog (clients send the prompt they want applied), but
//! the API serves it to the selection screen and the booth CLI resolves
//! theme ids against it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::transform::ThemeRef;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Grouping used by the theme selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeCategory {
    Events,
    Fun,
    Holidays,
}

impl ThemeCategory {
    pub const ALL: [ThemeCategory; 3] = [Self::Events, Self::Fun, Self::Holidays];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Fun => "fun",
            Self::Holidays => "holidays",
        }
    }

    /// Display descriptor (name + icon) for this category.
    pub fn info(self) -> CategoryInfo {
        match self {
            Self::Events => CategoryInfo {
                id: self,
                name: "Event Types",
                icon: "🎉",
            },
            Self::Fun => CategoryInfo {
                id: self,
                name: "Fun Styles",
                icon: "🎭",
            },
            Self::Holidays => CategoryInfo {
                id: self,
                name: "Holidays",
                icon: "🎄",
            },
        }
    }
}

impl std::str::FromStr for ThemeCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown theme category '{s}'. Must be one of: events, fun, holidays"
                ))
            })
    }
}

impl std::fmt::Display for ThemeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display descriptor for a [`ThemeCategory`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryInfo {
    pub id: ThemeCategory,
    pub name: &'static str,
    pub icon: &'static str,
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// A style definition. Immutable and defined at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ThemeCategory,
    pub icon: &'static str,
    pub prompt: &'static str,
}

impl Theme {
    /// The subset of the theme that travels to the relay.
    pub fn to_ref(&self) -> ThemeRef {
        ThemeRef {
            id: self.id.to_string(),
            name: self.name.to_string(),
            prompt: self.prompt.to_string(),
        }
    }
}

/// All themes, grouped by category in display order.
pub static THEMES: &[Theme] = &[
    // -- Events --
    Theme {
        id: "wedding",
        name: "Wedding Elegance",
        description: "Romantic, dreamy bridal aesthetic",
        category: ThemeCategory::Events,
        icon: "💒",
        prompt: "Transform this photo into an elegant wedding portrait. Add soft romantic lighting, subtle flower petals floating in the background, a dreamy bokeh effect, and give the person an elegant, sophisticated look as if they were at a luxury wedding venue. Keep their face recognizable but enhance with soft glamour makeup effects and warm golden lighting. Make it feel like a professional wedding photo.",
    },
    Theme {
        id: "birthday",
        name: "Birthday Celebration",
        description: "Balloons, confetti & party vibes",
        category: ThemeCategory::Events,
        icon: "🎂",
        prompt: "Transform this photo into a fun birthday party celebration scene. Add colorful balloons, confetti falling from above, party streamers, and festive lighting with colorful bokeh. Give the person a party hat or crown and make them look like the star of the celebration. Add sparkles and make the overall mood joyful and celebratory.",
    },
    Theme {
        id: "corporate",
        name: "Corporate Professional",
        description: "Polished executive portrait",
        category: ThemeCategory::Events,
        icon: "💼",
        prompt: "Transform this photo into a professional corporate headshot. Add a clean, modern office background with soft professional lighting. Give the person a polished, confident look with professional attire (suit or business wear). Use neutral, sophisticated colors and make it look like a LinkedIn professional photo or executive portrait.",
    },
    Theme {
        id: "quinceanera",
        name: "Quinceañera Princess",
        description: "Elegant gown, tiara & flowers",
        category: ThemeCategory::Events,
        icon: "👑",
        prompt: "Transform this photo into a stunning Quinceañera princess portrait. Add an elegant ball gown in pink or purple, a sparkling tiara, beautiful flower arrangements, and a grand ballroom background. Add soft romantic lighting, sparkles, and make it feel like a magical princess celebration. Include elegant jewelry and a sophisticated updo hairstyle.",
    },
    Theme {
        id: "make-me-laugh-events",
        name: "Make Me Laugh!",
        description: "Surprise me with a funny event mashup!",
        category: ThemeCategory::Events,
        icon: "😂",
        prompt: "Transform this photo into a hilariously unexpected event scene. Combine elements from a wedding, a birthday, and a corporate meeting in a funny, absurd, and unique way. For example, a person in a wedding dress with a party hat giving a serious corporate presentation. The goal is to make the user laugh with the output.",
    },
    // -- Fun --
    Theme {
        id: "superhero",
        name: "Superhero",
        description: "Comic book hero transformation",
        category: ThemeCategory::Fun,
        icon: "🦸",
        prompt: "Transform this photo into an epic superhero portrait. Give the person a colorful superhero costume with a cape, add dynamic comic book style lighting and effects, and place them against a dramatic city skyline or action scene background. Add energy effects, wind-blown elements, and make it look like a movie poster for a superhero film. Keep their face recognizable but heroic.",
    },
    Theme {
        id: "vintage",
        name: "Vintage Hollywood",
        description: "Classic glamour from the golden age",
        category: ThemeCategory::Fun,
        icon: "🎬",
        prompt: "Transform this photo into a classic vintage Hollywood glamour portrait from the 1940s-1950s. Add black and white or sepia toning, dramatic film noir lighting, and give the person an old Hollywood movie star look with elegant vintage styling. Add film grain, soft focus effects, and make it look like a classic cinema still photograph.",
    },
    Theme {
        id: "disco",
        name: "Disco Fever",
        description: "70s sparkle and glam",
        category: ThemeCategory::Fun,
        icon: "🪩",
        prompt: "Transform this photo into a groovy 1970s disco scene. Add a disco ball, colorful strobe lighting, sparkly outfits with platform shoes, and a retro dance floor background. Include rainbow light reflections, glitter effects, and funky disco fashion. Make it feel like Saturday Night Fever with vibrant colors and that iconic disco atmosphere.",
    },
    Theme {
        id: "western",
        name: "Western Cowboy",
        description: "Wild West ranch aesthetic",
        category: ThemeCategory::Fun,
        icon: "🤠",
        prompt: "Transform this photo into a Wild West cowboy/cowgirl portrait. Add a cowboy hat, western attire with boots and possibly a bandana, and place them in a desert sunset or rustic ranch setting. Include elements like a lasso, wooden fence, horses in the background, and warm golden hour lighting. Make it look like an authentic Western movie poster.",
    },
    Theme {
        id: "make-me-laugh-fun",
        name: "Make Me Laugh!",
        description: "Surprise me with a funny style mashup!",
        category: ThemeCategory::Fun,
        icon: "🤣",
        prompt: "Transform this photo into a hilariously unexpected style mashup. Combine elements from a superhero, a vintage Hollywood star, and a disco dancer in a funny, absurd, and unique way. For example, a superhero in a vintage gown on a disco floor. The goal is to make the user laugh with the output.",
    },
    // -- Holidays --
    Theme {
        id: "christmas",
        name: "Christmas Elf",
        description: "Santa's workshop helper",
        category: ThemeCategory::Holidays,
        icon: "🎄",
        prompt: "Transform this photo into a magical Christmas elf portrait. Give the person a festive elf costume with pointy ears and a fun hat, place them in Santa's workshop with toys and presents around, add falling snow, twinkling lights, and Christmas decorations. Make it feel warm, magical, and full of holiday cheer.",
    },
    Theme {
        id: "halloween",
        name: "Halloween Spooky",
        description: "Vampire, witch, or monster",
        category: ThemeCategory::Holidays,
        icon: "🎃",
        prompt: "Transform this photo into a spooky Halloween portrait. Turn the person into a stylish vampire, witch, or elegant gothic creature. Add a haunted house background, full moon, bats flying, jack-o-lanterns, and eerie purple and orange lighting. Make it scary but fun, like a classic Halloween movie poster.",
    },
    Theme {
        id: "valentines",
        name: "Valentine's Romance",
        description: "Hearts, pink & red aesthetic",
        category: ThemeCategory::Holidays,
        icon: "💕",
        prompt: "Transform this photo into a romantic Valentine's Day portrait. Add floating hearts, rose petals, soft pink and red lighting, and a dreamy romantic background. Give the person an elegant, romantic look with subtle heart-themed accessories. Add sparkles, soft bokeh effects, and make it feel like a love story movie poster.",
    },
    Theme {
        id: "july4th",
        name: "4th of July",
        description: "Patriotic stars & stripes",
        category: ThemeCategory::Holidays,
        icon: "🇺🇸",
        prompt: "Transform this photo into a patriotic 4th of July celebration portrait. Add American flag elements, red white and blue colors, fireworks in the background, and patriotic decorations. Give the person festive American-themed attire or accessories. Add sparklers, confetti in flag colors, and make it feel like an epic Independence Day celebration.",
    },
    Theme {
        id: "make-me-laugh-holidays",
        name: "Make Me Laugh!",
        description: "Surprise me with a funny holiday mashup!",
        category: ThemeCategory::Holidays,
        icon: "🤪",
        prompt: "Transform this photo into a hilariously unexpected holiday mashup. Combine elements from Christmas, Halloween, and Valentine's Day in a funny, absurd, and unique way. For example, a Christmas elf dressed as a vampire holding a heart-shaped box of chocolates. The goal is to make the user laugh with the output.",
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a theme by id.
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

/// Find a theme by id, returning [`CoreError::NotFound`] if it does not exist.
pub fn require_theme(id: &str) -> Result<&'static Theme, CoreError> {
    find_theme(id).ok_or_else(|| CoreError::NotFound {
        entity: "Theme",
        id: id.to_string(),
    })
}

/// All themes in a category, in catalog order.
pub fn themes_in_category(category: ThemeCategory) -> impl Iterator<Item = &'static Theme> {
    THEMES.iter().filter(move |t| t.category == category)
}

/// Category descriptors in display order.
pub fn categories() -> Vec<CategoryInfo> {
    ThemeCategory::ALL.iter().map(|c| c.info()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn theme_ids_are_unique() {
        let ids: HashSet<_> = THEMES.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), THEMES.len());
    }

    #[test]
    fn every_theme_has_prompt_and_icon() {
        for theme in THEMES {
            assert!(!theme.prompt.trim().is_empty(), "{} has no prompt", theme.id);
            assert!(!theme.icon.is_empty(), "{} has no icon", theme.id);
        }
    }

    #[test]
    fn each_category_has_five_themes_ending_with_a_mashup() {
        for category in ThemeCategory::ALL {
            let themes: Vec<_> = themes_in_category(category).collect();
            assert_eq!(themes.len(), 5, "category {category}");
            assert_eq!(themes.last().unwrap().name, "Make Me Laugh!");
        }
    }

    #[test]
    fn find_theme_by_id() {
        let theme = find_theme("disco").unwrap();
        assert_eq!(theme.name, "Disco Fever");
        assert_eq!(theme.category, ThemeCategory::Fun);
        assert!(find_theme("nope").is_none());
    }

    #[test]
    fn require_theme_reports_not_found() {
        assert_matches!(
            require_theme("nope"),
            Err(CoreError::NotFound { entity: "Theme", .. })
        );
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Holidays".parse::<ThemeCategory>().unwrap(), ThemeCategory::Holidays);
        assert_matches!("sports".parse::<ThemeCategory>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn theme_ref_carries_prompt() {
        let theme = find_theme("wedding").unwrap();
        let r = theme.to_ref();
        assert_eq!(r.id, "wedding");
        assert_eq!(r.prompt, theme.prompt);
    }

    #[test]
    fn theme_serializes_category_lowercase() {
        let json = serde_json::to_value(find_theme("halloween").unwrap()).unwrap();
        assert_eq!(json["category"], "holidays");
        assert_eq!(json["icon"], "🎃");
    }
}
