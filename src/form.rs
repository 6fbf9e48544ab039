use ratatui::layout::{Position, Rect};
use std::cell::Cell;
use std::rc::Rc;

use crate::error::{StoreError, SubmitError, ValidationError};
use crate::events::{ClickListeners, ClickSubscription};
use crate::funds::filter_candidates;
use crate::record::{
    parse_decimal, parse_months, parse_start_date, InvestmentRecord, MUTUAL_FUND,
};

/// Investment types the form offers, as (stored tag, label).
pub const INVESTMENT_TYPES: &[(&str, &str)] = &[(MUTUAL_FUND, "Mutual Fund")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Type,
    Name,
    SipAmount,
    SipDuration,
    CurrentAmount,
    StartDate,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::Type,
            Field::Name,
            Field::SipAmount,
            Field::SipDuration,
            Field::CurrentAmount,
            Field::StartDate,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Type => "Investment Type",
            Field::Name => "Name",
            Field::SipAmount => "SIP Amount",
            Field::SipDuration => "SIP Duration (months)",
            Field::CurrentAmount => "Current Amount",
            Field::StartDate => "Start Date (YYYY-MM-DD)",
        }
    }

    fn accepts(self, c: char, current: &str) -> bool {
        match self {
            Field::Type => false,
            Field::Name => !c.is_control(),
            Field::SipAmount | Field::CurrentAmount => {
                c.is_ascii_digit() || (c == '.' && !current.contains('.'))
            }
            Field::SipDuration => c.is_ascii_digit(),
            Field::StartDate => c.is_ascii_digit() || c == '-',
        }
    }
}

/// Fund name input with a suggestion list.
///
/// The list closes when the user clicks anywhere outside the component. The
/// click listener lives exactly as long as the component does.
pub struct FundAutocomplete {
    input: String,
    candidates: Vec<String>,
    highlighted: usize,
    open: Rc<Cell<bool>>,
    area: Rc<Cell<Rect>>,
    list_area: Cell<Rect>,
    _outside_click: ClickSubscription,
}

impl FundAutocomplete {
    pub fn new(listeners: &ClickListeners) -> Self {
        let open = Rc::new(Cell::new(false));
        let area = Rc::new(Cell::new(Rect::default()));
        let outside_click = {
            let open = Rc::clone(&open);
            let area = Rc::clone(&area);
            listeners.subscribe(move |column, row| {
                if !area.get().contains(Position::new(column, row)) {
                    open.set(false);
                }
            })
        };
        FundAutocomplete {
            input: String::new(),
            candidates: Vec::new(),
            highlighted: 0,
            open,
            area,
            list_area: Cell::new(Rect::default()),
            _outside_click: outside_click,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: &str, names: &[String]) {
        self.input = value.to_string();
        self.candidates = filter_candidates(value, names)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.highlighted = 0;
        self.open.set(!value.is_empty());
    }

    pub fn push_char(&mut self, c: char, names: &[String]) {
        let mut value = self.input.clone();
        value.push(c);
        self.set_input(&value, names);
    }

    pub fn pop_char(&mut self, names: &[String]) {
        let mut value = self.input.clone();
        value.pop();
        self.set_input(&value, names);
    }

    pub fn focus(&self) {
        self.open.set(true);
    }

    pub fn close(&self) {
        self.open.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.open.get() && !self.candidates.is_empty()
    }

    /// Candidates to display; empty while the list is closed.
    pub fn visible_candidates(&self) -> &[String] {
        if self.open.get() {
            &self.candidates
        } else {
            &[]
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        if self.highlighted + 1 < self.candidates.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Take candidate `index` as the fund name and close the list.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let chosen = self.candidates.get(index)?.clone();
        self.input = chosen;
        self.candidates.clear();
        self.highlighted = 0;
        self.open.set(false);
        Some(&self.input)
    }

    pub fn select_highlighted(&mut self) -> Option<&str> {
        self.select(self.highlighted)
    }

    /// Record where the input and its list were drawn.
    pub fn set_areas(&self, component: Rect, list: Rect) {
        self.area.set(component);
        self.list_area.set(list);
    }

    /// Candidate under a click, if the list is showing. Rows sit inside a border.
    pub fn candidate_at(&self, column: u16, row: u16) -> Option<usize> {
        let list = self.list_area.get();
        if !self.is_open() || !list.contains(Position::new(column, row)) {
            return None;
        }
        let index = row.checked_sub(list.y + 1)? as usize;
        (index < self.candidates.len()).then_some(index)
    }

    fn clear(&mut self) {
        self.input.clear();
        self.candidates.clear();
        self.highlighted = 0;
        self.open.set(false);
    }
}

/// Collects one investment record.
pub struct InvestmentForm {
    kind: Option<&'static str>,
    pub name: FundAutocomplete,
    sip_amount: String,
    sip_duration: String,
    current_amount: String,
    start_date: String,
    focus: Field,
}

impl InvestmentForm {
    pub fn new(listeners: &ClickListeners) -> Self {
        InvestmentForm {
            kind: None,
            name: FundAutocomplete::new(listeners),
            sip_amount: String::new(),
            sip_duration: String::new(),
            current_amount: String::new(),
            start_date: String::new(),
            focus: Field::Type,
        }
    }

    pub fn kind(&self) -> Option<&'static str> {
        self.kind
    }

    pub fn kind_label(&self) -> &'static str {
        INVESTMENT_TYPES
            .iter()
            .find(|(tag, _)| Some(*tag) == self.kind)
            .map(|(_, label)| *label)
            .unwrap_or("Select")
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Fields currently on screen: details only appear once a type is chosen.
    pub fn visible_fields(&self) -> &'static [Field] {
        if self.kind.is_some() {
            Field::all()
        } else {
            &Field::all()[..1]
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Type => self.kind_label(),
            Field::Name => self.name.input(),
            Field::SipAmount => &self.sip_amount,
            Field::SipDuration => &self.sip_duration,
            Field::CurrentAmount => &self.current_amount,
            Field::StartDate => &self.start_date,
        }
    }

    /// Change the investment type. Every detail field starts over.
    pub fn select_type(&mut self, kind: Option<&'static str>) {
        self.kind = kind;
        self.name.clear();
        self.sip_amount.clear();
        self.sip_duration.clear();
        self.current_amount.clear();
        self.start_date.clear();
    }

    /// Step through "Select" and each offered type.
    pub fn cycle_type(&mut self) {
        let position = INVESTMENT_TYPES
            .iter()
            .position(|(tag, _)| Some(*tag) == self.kind);
        let next = match position {
            None => Some(INVESTMENT_TYPES[0].0),
            Some(i) if i + 1 < INVESTMENT_TYPES.len() => Some(INVESTMENT_TYPES[i + 1].0),
            Some(_) => None,
        };
        self.select_type(next);
    }

    fn set_focus(&mut self, field: Field) {
        if self.focus == Field::Name && field != Field::Name {
            self.name.close();
        }
        self.focus = field;
        if field == Field::Name {
            self.name.focus();
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.visible_fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(fields[(i + 1) % fields.len()]);
    }

    pub fn focus_previous(&mut self) {
        let fields = self.visible_fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.set_focus(fields[(i + fields.len() - 1) % fields.len()]);
    }

    pub fn input_char(&mut self, c: char, names: &[String]) {
        let field = self.focus;
        if !field.accepts(c, self.value(field)) {
            return;
        }
        match field {
            Field::Type => {}
            Field::Name => self.name.push_char(c, names),
            Field::SipAmount => self.sip_amount.push(c),
            Field::SipDuration => self.sip_duration.push(c),
            Field::CurrentAmount => self.current_amount.push(c),
            Field::StartDate => self.start_date.push(c),
        }
    }

    pub fn backspace(&mut self, names: &[String]) {
        match self.focus {
            Field::Type => {}
            Field::Name => self.name.pop_char(names),
            Field::SipAmount => {
                self.sip_amount.pop();
            }
            Field::SipDuration => {
                self.sip_duration.pop();
            }
            Field::CurrentAmount => {
                self.current_amount.pop();
            }
            Field::StartDate => {
                self.start_date.pop();
            }
        }
    }

    /// Validate the fields and build a record without touching the form.
    pub fn validate(&self) -> Result<InvestmentRecord, ValidationError> {
        build_record(
            self.kind,
            self.name.input(),
            &self.sip_amount,
            &self.sip_duration,
            &self.current_amount,
            &self.start_date,
        )
    }

    /// Validate, hand the record to `commit`, and clear the form (type
    /// included) once `commit` succeeds. On any error the input is kept.
    pub fn submit<F>(&mut self, commit: F) -> Result<InvestmentRecord, SubmitError>
    where
        F: FnOnce(&InvestmentRecord) -> Result<(), StoreError>,
    {
        let record = self.validate()?;
        commit(&record)?;
        self.select_type(None);
        self.set_focus(Field::Type);
        Ok(record)
    }
}

fn required<'a>(value: &'a str, label: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::FieldRequired(label))
    } else {
        Ok(trimmed)
    }
}

/// Check raw field text and turn it into a record.
pub fn build_record(
    kind: Option<&str>,
    name: &str,
    sip_amount: &str,
    sip_duration: &str,
    current_amount: &str,
    start_date: &str,
) -> Result<InvestmentRecord, ValidationError> {
    let kind = kind.ok_or(ValidationError::TypeRequired)?;
    let (kind, _) = INVESTMENT_TYPES
        .iter()
        .find(|(tag, _)| *tag == kind)
        .ok_or_else(|| ValidationError::UnknownType(kind.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let amount_text = required(sip_amount, "SIP amount")?;
    let amount = parse_decimal(amount_text)?;
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }

    let duration_text = required(sip_duration, "SIP duration")?;
    parse_months(duration_text)?;

    let current_text = required(current_amount, "Current amount")?;
    let current = parse_decimal(current_text)?;
    if current < 0.0 {
        return Err(ValidationError::NegativeCurrentAmount(current));
    }

    let date_text = required(start_date, "Start date")?;
    parse_start_date(date_text)?;

    let record =
        InvestmentRecord::new(name, amount_text, duration_text, current_text, date_text);
    Ok(record.with_kind(kind))
}
