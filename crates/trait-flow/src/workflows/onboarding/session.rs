use std::sync::Arc;

use serde::Serialize;

use crate::workflows::personality::{
    compute_scores, AnswerSet, BigFiveTrait, InventoryItem, Likert, LikertError, RadarChart,
    TipiInventory, TraitScores,
};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    Quiz { page: usize },
    Result,
}

impl OnboardingStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Quiz { .. } => "quiz",
            Self::Result => "result",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("onboarding has already started")]
    AlreadyStarted,
    #[error("action not available during the {0} step")]
    WrongStep(&'static str),
    #[error("item {0} is not on the current page")]
    ItemNotOnPage(u8),
    #[error(transparent)]
    InvalidResponse(#[from] LikertError),
    #[error("page {page} still has unanswered items {missing:?}")]
    PageIncomplete { page: usize, missing: Vec<u8> },
}

/// One user's pass through welcome, quiz pages, and result.
#[derive(Debug, Clone)]
pub struct OnboardingSession {
    inventory: Arc<TipiInventory>,
    page_size: usize,
    step: OnboardingStep,
    answers: AnswerSet,
    scores: Option<TraitScores>,
}

impl OnboardingSession {
    pub fn new(inventory: Arc<TipiInventory>, page_size: usize) -> Result<Self, OnboardingError> {
        if page_size == 0 {
            return Err(OnboardingError::InvalidPageSize);
        }

        Ok(Self {
            inventory,
            page_size,
            step: OnboardingStep::Welcome,
            answers: AnswerSet::new(),
            scores: None,
        })
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn scores(&self) -> Option<TraitScores> {
        self.scores
    }

    pub fn page_count(&self) -> usize {
        self.inventory.len().div_ceil(self.page_size)
    }

    pub fn page_items(&self, page: usize) -> &[InventoryItem] {
        self.inventory
            .items()
            .chunks(self.page_size)
            .nth(page)
            .unwrap_or_default()
    }

    pub fn start(&mut self) -> Result<OnboardingStep, OnboardingError> {
        match self.step {
            OnboardingStep::Welcome => {
                self.step = OnboardingStep::Quiz { page: 0 };
                Ok(self.step)
            }
            _ => Err(OnboardingError::AlreadyStarted),
        }
    }

    /// Records a response for an item on the current page, replacing any earlier one.
    pub fn answer(&mut self, item_id: u8, value: u8) -> Result<(), OnboardingError> {
        let page = self.current_page()?;
        if !self.page_items(page).iter().any(|item| item.id == item_id) {
            return Err(OnboardingError::ItemNotOnPage(item_id));
        }

        let response = Likert::new(value)?;
        self.answers.record(item_id, response.value());
        Ok(())
    }

    /// Ids on the current page that still lack a response.
    pub fn missing_on_page(&self) -> Vec<u8> {
        match self.step {
            OnboardingStep::Quiz { page } => self
                .page_items(page)
                .iter()
                .filter(|item| !self.answers.is_answered(item.id))
                .map(|item| item.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.step, OnboardingStep::Quiz { .. }) && self.missing_on_page().is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.step, OnboardingStep::Quiz { page } if page > 0)
    }

    /// Moves to the next page, or scores the answers and enters `Result` from the last page.
    pub fn next(&mut self) -> Result<OnboardingStep, OnboardingError> {
        let page = self.current_page()?;
        let missing = self.missing_on_page();
        if !missing.is_empty() {
            return Err(OnboardingError::PageIncomplete { page, missing });
        }

        if page + 1 < self.page_count() {
            self.step = OnboardingStep::Quiz { page: page + 1 };
        } else {
            self.scores = Some(compute_scores(&self.inventory, &self.answers));
            self.step = OnboardingStep::Result;
        }
        Ok(self.step)
    }

    /// Returns to the previous page; stays put on the first one.
    pub fn back(&mut self) -> Result<OnboardingStep, OnboardingError> {
        let page = self.current_page()?;
        if page > 0 {
            self.step = OnboardingStep::Quiz { page: page - 1 };
        }
        Ok(self.step)
    }

    pub fn view(&self) -> OnboardingView {
        let (page, items) = match self.step {
            OnboardingStep::Quiz { page } => {
                let items = self
                    .page_items(page)
                    .iter()
                    .map(|item| QuizItemView {
                        id: item.id,
                        prompt: item.prompt,
                        response: self.answers.get(item.id),
                    })
                    .collect();
                (Some(page), items)
            }
            _ => (None, Vec::new()),
        };

        OnboardingView {
            step: self.step.label(),
            page,
            page_count: self.page_count(),
            items,
            answered: self.answers.len(),
            total: self.inventory.len(),
            can_advance: self.can_advance(),
            can_go_back: self.can_go_back(),
            scores: self.scores,
            dominant_trait: self.scores.map(|scores| scores.dominant_trait()),
            chart: self.scores.as_ref().map(RadarChart::from_scores),
        }
    }

    fn current_page(&self) -> Result<usize, OnboardingError> {
        match self.step {
            OnboardingStep::Quiz { page } => Ok(page),
            other => Err(OnboardingError::WrongStep(other.label())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizItemView {
    pub id: u8,
    pub prompt: &'static str,
    pub response: Option<u8>,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingView {
    pub step: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    pub page_count: usize,
    pub items: Vec<QuizItemView>,
    pub answered: usize,
    pub total: usize,
    pub can_advance: bool,
    pub can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<TraitScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_trait: Option<BigFiveTrait>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<RadarChart>,
}
