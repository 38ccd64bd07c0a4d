use crate::workflows::personality::BigFiveTrait;

/// Fixed message template per trait, indexed in [`BigFiveTrait::ordered`] order.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: [&'static str; 5],
}

impl TemplateTable {
    pub fn standard() -> Self {
        Self {
            templates: [
                "Put your outgoing energy to work today: look for a chance to talk with someone new. It is bound to be a good spark.",
                "Your warmth toward others is a real strength. Why not take time today to truly listen to someone? Your attention can be a big support to them.",
                "Bring that steady diligence to a single task today and see it through. You should come away with a real sense of accomplishment.",
                "How about setting a few worries down? Make time today for just five minutes of deep breathing somewhere quiet.",
                "Today is a day for your curiosity to shine. Try a different route than usual, or put on a genre of music you have never explored.",
            ],
        }
    }

    pub fn template_for(&self, trait_: BigFiveTrait) -> &'static str {
        self.templates[trait_.index()]
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::standard()
    }
}
