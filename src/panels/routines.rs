//! Automation routines: the editor form, its validation and the routine
//! store with learned suggestions.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PanelError, ValidationError};

/// Actions whose name carries this prefix speak the rest of the name
pub const TTS_PREFIX: &str = "tts_speak:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerKind {
    #[default]
    #[serde(rename = "NLP")]
    Nlp,
    Tiempo,
    Evento,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 3] = [TriggerKind::Nlp, TriggerKind::Tiempo, TriggerKind::Evento];

    pub fn label(self) -> &'static str {
        match self {
            TriggerKind::Nlp => "Comando de voz",
            TriggerKind::Tiempo => "Programado",
            TriggerKind::Evento => "Evento",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Nlp => "NLP",
            TriggerKind::Tiempo => "Tiempo",
            TriggerKind::Evento => "Evento",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        TriggerKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Trigger {
    #[serde(rename = "NLP")]
    Nlp { phrase: String },
    Tiempo {
        hour: String,
        days: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
    Evento {
        #[serde(rename = "deviceId")]
        device_id: String,
        event: String,
    },
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Nlp { .. } => TriggerKind::Nlp,
            Trigger::Tiempo { .. } => TriggerKind::Tiempo,
            Trigger::Evento { .. } => TriggerKind::Evento,
        }
    }
}

/// Human-readable one-liner for a trigger
pub fn describe_trigger(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Nlp { phrase } => format!("Comando de voz: \"{}\"", phrase),
        Trigger::Tiempo { hour, .. } => format!("Programado: {}", hour),
        Trigger::Evento { event, .. } => format!("Evento: {}", event),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineAction {
    pub id: String,
    pub name: String,
}

impl RoutineAction {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Spoken text, for text-to-speech actions
    pub fn tts_message(&self) -> Option<&str> {
        self.name.strip_prefix(TTS_PREFIX).map(str::trim)
    }
}

pub fn available_actions() -> Vec<RoutineAction> {
    vec![
        RoutineAction::new("action_1", "Encender Luz Sala"),
        RoutineAction::new("action_2", "Apagar Luz Sala"),
        RoutineAction::new("action_3", "Ajustar Termostato"),
    ]
}

pub struct DeviceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub events: &'static [&'static str],
}

pub const DEVICE_OPTIONS: [DeviceOption; 3] = [
    DeviceOption {
        id: "luz_sala",
        name: "Luz Sala",
        events: &["encendido", "apagado"],
    },
    DeviceOption {
        id: "termostato",
        name: "Termostato",
        events: &["temperatura_alta", "temperatura_baja"],
    },
    DeviceOption {
        id: "puerta",
        name: "Puerta Principal",
        events: &["abierta", "cerrada"],
    },
];

pub fn device_option(id: &str) -> Option<&'static DeviceOption> {
    DEVICE_OPTIONS.iter().find(|d| d.id == id)
}

/// `(key, label)` in week order
pub const DAY_LABELS: [(&str, &str); 7] = [
    ("lun", "Lunes"),
    ("mar", "Martes"),
    ("mie", "Miércoles"),
    ("jue", "Jueves"),
    ("vie", "Viernes"),
    ("sab", "Sábado"),
    ("dom", "Domingo"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub confirmed: bool,
    pub trigger: Trigger,
    pub actions: Vec<RoutineAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    /// 0.0 to 1.0
    pub confidence: f32,
    pub trigger: Trigger,
    pub actions: Vec<RoutineAction>,
}

impl Suggestion {
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Editor state for creating or editing a routine
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineForm {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub trigger_kind: TriggerKind,
    pub nlp_phrase: String,
    pub time_hour: String,
    pub time_days: Vec<String>,
    pub time_date: String,
    pub device_id: String,
    pub device_event: String,
    pub action_ids: Vec<String>,
    pub tts_messages: Vec<String>,
    pub tts_input: String,
}

impl Default for RoutineForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            enabled: true,
            trigger_kind: TriggerKind::Nlp,
            nlp_phrase: String::new(),
            time_hour: "08:00".to_string(),
            time_days: Vec::new(),
            time_date: String::new(),
            device_id: String::new(),
            device_event: String::new(),
            action_ids: Vec::new(),
            tts_messages: Vec::new(),
            tts_input: String::new(),
        }
    }
}

fn toggle_entry(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

impl RoutineForm {
    /// Prefill the editor from an existing routine
    pub fn from_routine(routine: &Routine) -> Self {
        let mut form = Self {
            name: routine.name.clone(),
            description: routine.description.clone(),
            enabled: routine.enabled,
            trigger_kind: routine.trigger.kind(),
            ..Self::default()
        };

        match &routine.trigger {
            Trigger::Nlp { phrase } => form.nlp_phrase = phrase.clone(),
            Trigger::Tiempo { hour, days, date } => {
                form.time_hour = hour.clone();
                form.time_days = days.clone();
                form.time_date = date.clone().unwrap_or_default();
            }
            Trigger::Evento { device_id, event } => {
                form.device_id = device_id.clone();
                form.device_event = event.clone();
            }
        }

        let known = available_actions();
        for action in &routine.actions {
            match action.tts_message() {
                Some(message) => form.tts_messages.push(message.to_string()),
                None if known.iter().any(|a| a.id == action.id) => {
                    form.action_ids.push(action.id.clone())
                }
                None => {}
            }
        }
        form
    }

    pub fn toggle_day(&mut self, day: &str) {
        toggle_entry(&mut self.time_days, day);
    }

    pub fn toggle_action(&mut self, action_id: &str) {
        toggle_entry(&mut self.action_ids, action_id);
    }

    /// Move the pending TTS input into the message list
    pub fn add_tts_message(&mut self) -> bool {
        let message = self.tts_input.trim();
        if message.is_empty() {
            return false;
        }
        self.tts_messages.push(message.to_string());
        self.tts_input.clear();
        true
    }

    pub fn remove_tts_message(&mut self, index: usize) {
        if index < self.tts_messages.len() {
            self.tts_messages.remove(index);
        }
    }

    /// Picking another device resets the event
    pub fn select_device(&mut self, device_id: &str) {
        if self.device_id != device_id {
            self.device_id = device_id.to_string();
            self.device_event.clear();
        }
    }

    pub fn trigger(&self) -> Result<Trigger, ValidationError> {
        match self.trigger_kind {
            TriggerKind::Nlp => {
                let phrase = self.nlp_phrase.trim();
                if phrase.is_empty() {
                    return Err(ValidationError::PhraseRequired);
                }
                Ok(Trigger::Nlp {
                    phrase: phrase.to_string(),
                })
            }
            TriggerKind::Tiempo => {
                let hour = self.time_hour.trim();
                if hour.len() != 5 || NaiveTime::parse_from_str(hour, "%H:%M").is_err() {
                    return Err(ValidationError::InvalidHour);
                }
                let date = self.time_date.trim();
                Ok(Trigger::Tiempo {
                    hour: hour.to_string(),
                    days: self.time_days.clone(),
                    date: (!date.is_empty()).then(|| date.to_string()),
                })
            }
            TriggerKind::Evento => {
                let device = device_option(&self.device_id);
                match device {
                    Some(d) if d.events.contains(&self.device_event.as_str()) => {
                        Ok(Trigger::Evento {
                            device_id: self.device_id.clone(),
                            event: self.device_event.clone(),
                        })
                    }
                    _ => Err(ValidationError::EventRequired),
                }
            }
        }
    }

    pub fn actions(&self) -> Vec<RoutineAction> {
        let known = available_actions();
        let picked = self
            .action_ids
            .iter()
            .filter_map(|id| known.iter().find(|a| &a.id == id).cloned());
        let spoken = self
            .tts_messages
            .iter()
            .enumerate()
            .map(|(i, m)| RoutineAction {
                id: format!("tts_{}", i + 1),
                name: format!("{}{}", TTS_PREFIX, m),
            });
        picked.chain(spoken).collect()
    }

    /// Check the form and produce the routine fields it describes
    pub fn validate(&self) -> Result<(Trigger, Vec<RoutineAction>), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let trigger = self.trigger()?;
        let actions = self.actions();
        if actions.is_empty() {
            return Err(ValidationError::ActionRequired);
        }
        Ok((trigger, actions))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutineFilter {
    #[default]
    All,
    Confirmed,
    Unconfirmed,
}

impl RoutineFilter {
    pub const ALL: [RoutineFilter; 3] = [
        RoutineFilter::All,
        RoutineFilter::Confirmed,
        RoutineFilter::Unconfirmed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RoutineFilter::All => "Todas",
            RoutineFilter::Confirmed => "Confirmadas",
            RoutineFilter::Unconfirmed => "Sin confirmar",
        }
    }

    fn accepts(self, routine: &Routine) -> bool {
        match self {
            RoutineFilter::All => true,
            RoutineFilter::Confirmed => routine.confirmed,
            RoutineFilter::Unconfirmed => !routine.confirmed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutineStore {
    routines: Vec<Routine>,
    suggestions: Vec<Suggestion>,
    next_id: u64,
    pub filter: RoutineFilter,
}

impl RoutineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One confirmed routine and one learned routine awaiting confirmation
    pub fn with_mock_data() -> Self {
        let mut store = Self::new();
        store.push(
            "Buenos días",
            "Enciende la sala al despertar",
            true,
            Trigger::Tiempo {
                hour: "07:00".to_string(),
                days: vec!["lun".into(), "mar".into(), "mie".into(), "jue".into(), "vie".into()],
                date: None,
            },
            vec![
                RoutineAction::new("action_1", "Encender Luz Sala"),
                RoutineAction::new("tts_1", "tts_speak: Buenos días"),
            ],
        );
        store.push(
            "Modo noche",
            "Aprendida de tu uso habitual",
            false,
            Trigger::Nlp {
                phrase: "buenas noches".to_string(),
            },
            vec![RoutineAction::new("action_2", "Apagar Luz Sala")],
        );
        store
    }

    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }

    fn push(
        &mut self,
        name: &str,
        description: &str,
        confirmed: bool,
        trigger: Trigger,
        actions: Vec<RoutineAction>,
    ) -> &Routine {
        let id = self.allocate_id("rutina");
        self.routines.push(Routine {
            id,
            name: name.to_string(),
            description: description.to_string(),
            enabled: true,
            confirmed,
            trigger,
            actions,
            last_run: None,
        });
        &self.routines[self.routines.len() - 1]
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Routine, PanelError> {
        self.routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PanelError::UnknownRoutine(id.to_string()))
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    pub fn filtered(&self) -> Vec<&Routine> {
        self.routines
            .iter()
            .filter(|r| self.filter.accepts(r))
            .collect()
    }

    pub fn create(&mut self, form: &RoutineForm) -> Result<&Routine, PanelError> {
        let (trigger, actions) = form.validate()?;
        let enabled = form.enabled;
        let id = self.allocate_id("rutina");
        self.routines.push(Routine {
            id,
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            enabled,
            confirmed: true,
            trigger,
            actions,
            last_run: None,
        });
        let created = &self.routines[self.routines.len() - 1];
        tracing::info!("Created routine {} ({})", created.name, created.id);
        Ok(created)
    }

    pub fn update(&mut self, id: &str, form: &RoutineForm) -> Result<(), PanelError> {
        let (trigger, actions) = form.validate()?;
        let routine = self.find_mut(id)?;
        routine.name = form.name.trim().to_string();
        routine.description = form.description.trim().to_string();
        routine.enabled = form.enabled;
        routine.trigger = trigger;
        routine.actions = actions;
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Routine, PanelError> {
        let pos = self
            .routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| PanelError::UnknownRoutine(id.to_string()))?;
        Ok(self.routines.remove(pos))
    }

    /// Returns the new enabled state
    pub fn toggle_enabled(&mut self, id: &str) -> Result<bool, PanelError> {
        let routine = self.find_mut(id)?;
        routine.enabled = !routine.enabled;
        Ok(routine.enabled)
    }

    pub fn confirm(&mut self, id: &str) -> Result<(), PanelError> {
        self.find_mut(id)?.confirmed = true;
        Ok(())
    }

    /// Rejecting a learned routine discards it
    pub fn reject(&mut self, id: &str) -> Result<Routine, PanelError> {
        self.delete(id)
    }

    /// Execute the actions now; returns what was run in order
    pub fn run_now(&mut self, id: &str) -> Result<Vec<String>, PanelError> {
        let routine = self.find_mut(id)?;
        routine.last_run = Some(Utc::now());
        let ran: Vec<String> = routine
            .actions
            .iter()
            .map(|a| match a.tts_message() {
                Some(message) => format!("Decir: {}", message),
                None => a.name.clone(),
            })
            .collect();
        tracing::info!("Ran routine {}: {:?}", routine.name, ran);
        Ok(ran)
    }

    /// Refill suggestions from recent activity. Mocked with a fixed set.
    pub fn generate_suggestions(&mut self) {
        let first = self.allocate_id("sugerencia");
        let second = self.allocate_id("sugerencia");
        self.suggestions = vec![
            Suggestion {
                id: first,
                name: "Apagar todo al salir".to_string(),
                confidence: 0.82,
                trigger: Trigger::Nlp {
                    phrase: "me voy".to_string(),
                },
                actions: vec![RoutineAction::new("action_2", "Apagar Luz Sala")],
            },
            Suggestion {
                id: second,
                name: "Clima por la tarde".to_string(),
                confidence: 0.56,
                trigger: Trigger::Tiempo {
                    hour: "17:30".to_string(),
                    days: vec!["sab".into(), "dom".into()],
                    date: None,
                },
                actions: vec![RoutineAction::new("action_3", "Ajustar Termostato")],
            },
        ];
    }

    /// Turn a suggestion into a confirmed routine
    pub fn accept_suggestion(&mut self, id: &str) -> Result<&Routine, PanelError> {
        let pos = self
            .suggestions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PanelError::UnknownRoutine(id.to_string()))?;
        let suggestion = self.suggestions.remove(pos);
        Ok(self.push(
            &suggestion.name,
            "",
            true,
            suggestion.trigger,
            suggestion.actions,
        ))
    }

    pub fn reject_suggestion(&mut self, id: &str) -> bool {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| s.id != id);
        self.suggestions.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RoutineForm {
        RoutineForm {
            name: "Llegada".to_string(),
            nlp_phrase: "ya llegué".to_string(),
            action_ids: vec!["action_1".to_string()],
            ..RoutineForm::default()
        }
    }

    #[test]
    fn test_describe_trigger() {
        assert_eq!(
            describe_trigger(&Trigger::Nlp {
                phrase: "hola".into()
            }),
            "Comando de voz: \"hola\""
        );
        assert_eq!(
            describe_trigger(&Trigger::Tiempo {
                hour: "08:00".into(),
                days: vec![],
                date: None
            }),
            "Programado: 08:00"
        );
        assert_eq!(
            describe_trigger(&Trigger::Evento {
                device_id: "puerta".into(),
                event: "abierta".into()
            }),
            "Evento: abierta"
        );
    }

    #[test]
    fn test_validation_order() {
        let mut form = valid_form();
        form.name = "  ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::NameRequired));

        let mut form = valid_form();
        form.nlp_phrase.clear();
        assert_eq!(form.validate(), Err(ValidationError::PhraseRequired));

        let mut form = valid_form();
        form.action_ids.clear();
        assert_eq!(form.validate(), Err(ValidationError::ActionRequired));

        form.tts_input = "  hola  ".to_string();
        assert!(form.add_tts_message());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_time_trigger_hour() {
        let mut form = valid_form();
        form.trigger_kind = TriggerKind::Tiempo;
        for bad in ["", "8:00", "25:00", "12:60", "ab:cd"] {
            form.time_hour = bad.to_string();
            assert_eq!(form.trigger(), Err(ValidationError::InvalidHour), "{bad}");
        }
        form.time_hour = "21:15".to_string();
        form.toggle_day("sab");
        assert_eq!(
            form.trigger().unwrap(),
            Trigger::Tiempo {
                hour: "21:15".into(),
                days: vec!["sab".into()],
                date: None
            }
        );
    }

    #[test]
    fn test_event_trigger_needs_matching_event() {
        let mut form = valid_form();
        form.trigger_kind = TriggerKind::Evento;
        assert_eq!(form.trigger(), Err(ValidationError::EventRequired));

        form.select_device("puerta");
        form.device_event = "encendido".to_string();
        assert_eq!(form.trigger(), Err(ValidationError::EventRequired));

        form.device_event = "abierta".to_string();
        assert!(form.trigger().is_ok());

        form.select_device("termostato");
        assert!(form.device_event.is_empty());
    }

    #[test]
    fn test_form_roundtrip_through_routine() {
        let mut store = RoutineStore::new();
        let mut form = valid_form();
        form.tts_messages.push("Bienvenido".to_string());
        let id = store.create(&form).unwrap().id.clone();

        let routine = store.get(&id).unwrap();
        assert_eq!(routine.actions.len(), 2);
        assert_eq!(routine.actions[1].name, "tts_speak:Bienvenido");

        let prefilled = RoutineForm::from_routine(routine);
        assert_eq!(prefilled.action_ids, vec!["action_1"]);
        assert_eq!(prefilled.tts_messages, vec!["Bienvenido"]);
        assert_eq!(prefilled.nlp_phrase, "ya llegué");
    }

    #[test]
    fn test_invalid_form_creates_nothing() {
        let mut store = RoutineStore::new();
        let form = RoutineForm::default();
        assert!(matches!(
            store.create(&form),
            Err(PanelError::Invalid(ValidationError::NameRequired))
        ));
        assert!(store.routines().is_empty());
    }

    #[test]
    fn test_store_operations() {
        let mut store = RoutineStore::with_mock_data();
        let learned = store
            .routines()
            .iter()
            .find(|r| !r.confirmed)
            .unwrap()
            .id
            .clone();

        store.filter = RoutineFilter::Unconfirmed;
        assert_eq!(store.filtered().len(), 1);

        store.confirm(&learned).unwrap();
        assert!(store.filtered().is_empty());

        assert!(!store.toggle_enabled(&learned).unwrap());
        let ran = store.run_now(&learned).unwrap();
        assert_eq!(ran, vec!["Apagar Luz Sala"]);
        assert!(store.get(&learned).unwrap().last_run.is_some());

        store.reject(&learned).unwrap();
        assert!(store.get(&learned).is_none());
        assert!(matches!(
            store.confirm(&learned),
            Err(PanelError::UnknownRoutine(_))
        ));
    }

    #[test]
    fn test_run_speaks_tts_actions() {
        let mut store = RoutineStore::with_mock_data();
        let id = store.routines()[0].id.clone();
        let ran = store.run_now(&id).unwrap();
        assert_eq!(ran, vec!["Encender Luz Sala", "Decir: Buenos días"]);
    }

    #[test]
    fn test_suggestions() {
        let mut store = RoutineStore::new();
        store.generate_suggestions();
        assert_eq!(store.suggestions().len(), 2);
        assert_eq!(store.suggestions()[0].confidence_percent(), 82);

        let first = store.suggestions()[0].id.clone();
        let second = store.suggestions()[1].id.clone();

        let routine = store.accept_suggestion(&first).unwrap();
        assert!(routine.confirmed);
        assert!(store.reject_suggestion(&second));
        assert!(!store.reject_suggestion(&second));
        assert!(store.suggestions().is_empty());
        assert_eq!(store.routines().len(), 1);
    }

    #[test]
    fn test_trigger_wire_format() {
        let json = serde_json::to_value(Trigger::Evento {
            device_id: "puerta".into(),
            event: "abierta".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Evento", "deviceId": "puerta", "event": "abierta"})
        );
    }
}
