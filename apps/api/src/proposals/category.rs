//! Project categories and their fixed "explicitly not included" line items.

/// The category chosen on the proposal form.
///
/// Unknown labels resolve to `WebDesign` via `from_label`; the submitted label
/// itself is still stored and shown to the model verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCategory {
    WebDesign,
    WebDevelopment,
    MobileApp,
    Copywriting,
    GraphicDesign,
    Seo,
    VideoEditing,
    SocialMedia,
}

impl ProjectCategory {
    pub const DEFAULT: ProjectCategory = ProjectCategory::WebDesign;

    /// Exact, case-sensitive match on the form label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Web Design" => ProjectCategory::WebDesign,
            "Web Development" => ProjectCategory::WebDevelopment,
            "Mobile App" => ProjectCategory::MobileApp,
            "Copywriting" => ProjectCategory::Copywriting,
            "Graphic Design" => ProjectCategory::GraphicDesign,
            "SEO" => ProjectCategory::Seo,
            "Video Editing" => ProjectCategory::VideoEditing,
            "Social Media" => ProjectCategory::SocialMedia,
            _ => Self::DEFAULT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::WebDesign => "Web Design",
            ProjectCategory::WebDevelopment => "Web Development",
            ProjectCategory::MobileApp => "Mobile App",
            ProjectCategory::Copywriting => "Copywriting",
            ProjectCategory::GraphicDesign => "Graphic Design",
            ProjectCategory::Seo => "SEO",
            ProjectCategory::VideoEditing => "Video Editing",
            ProjectCategory::SocialMedia => "Social Media",
        }
    }

    pub fn exclusions(&self) -> &'static [&'static str] {
        match self {
            ProjectCategory::WebDesign => &[
                "Content writing or copywriting",
                "Stock photo licensing fees",
                "Domain registration or hosting fees",
                "Third-party plugin licenses",
                "Post-launch bug fixes after 14 days",
                "Social media graphics",
            ],
            ProjectCategory::WebDevelopment => &[
                "UI/UX design unless specified",
                "Content population into CMS",
                "Third-party API costs or licenses",
                "Server setup beyond basic deployment",
                "Ongoing maintenance after delivery",
                "Browser testing beyond Chrome/Firefox/Safari",
            ],
            ProjectCategory::MobileApp => &[
                "App Store/Play Store submission fees",
                "Backend/API development unless specified",
                "UI/UX design unless specified",
                "Push notification service costs",
                "Third-party SDK licenses",
                "Post-launch updates or new features",
            ],
            ProjectCategory::Copywriting => &[
                "Design or visual layout work",
                "SEO keyword research",
                "Translation to other languages",
                "Printing or production costs",
                "Distribution or publishing",
                "Social media management",
            ],
            ProjectCategory::GraphicDesign => &[
                "Copywriting or text content",
                "Stock image licensing",
                "Printing or production costs",
                "Animation or motion graphics",
                "Website implementation",
                "Social media management",
            ],
            ProjectCategory::Seo => &[
                "Content writing unless specified",
                "Paid advertising management",
                "Website development changes",
                "Link building outreach",
                "Social media management",
                "Guaranteed ranking results",
            ],
            ProjectCategory::VideoEditing => &[
                "Original footage filming",
                "Script writing or voiceover",
                "Music licensing fees",
                "Motion graphics unless specified",
                "Color grading unless specified",
                "Distribution or publishing",
            ],
            ProjectCategory::SocialMedia => &[
                "Paid advertising budget",
                "Content photography or videography",
                "Website updates or changes",
                "Customer service or DM responses",
                "Influencer outreach or fees",
                "Guaranteed follower growth",
            ],
        }
    }

    /// Exclusions as a `1. item` list, one per line.
    pub fn numbered_exclusions(&self) -> String {
        self.exclusions()
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
