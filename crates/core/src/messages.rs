use crate::models::Locale;

/// The fixed set of user-visible outcome messages, one catalog per locale.
/// Every terminal turn outcome maps onto exactly one of these.
#[derive(Debug, Clone, Copy)]
pub struct MessageCatalog {
    no_scheme: &'static str,
    ask_field: &'static str,
    apply_start: &'static str,
    apply_success: &'static str,
    not_eligible: &'static str,
    recommend: &'static str,
    elicit_prompt: &'static str,
}

const MARATHI: MessageCatalog = MessageCatalog {
    no_scheme: "माफ करा, मी कोणतीही योजना सापडली नाही. कृपया थोडे अधिक माहिती द्या.",
    ask_field: "कृपया तुमचे {field} सांगा.",
    apply_start: "तुम्ही {scheme} साठी पात्र आहात. मी आता अर्ज करणार आहे.",
    apply_success: "{message}. अर्ज क्रमांक: {id}",
    not_eligible: "तुम्ही सध्याच्या माहितीनुसार पात्र दाखवत नाही. मी पर्यायी योजना शोधत आहे.",
    recommend: "शिफारस: {name} - {desc}",
    elicit_prompt: "Enter {field} (Marathi / numeric): ",
};

const TELUGU: MessageCatalog = MessageCatalog {
    no_scheme: "క్షమించండి, నేను ఏ పథకమును కనుగొనలేకపోయాను. దయచేసి మరింత సమాచారం ఇవ్వండి.",
    ask_field: "దయచేసి మీ {field} చెప్పండి.",
    apply_start: "మీరు {scheme} కోసం అర్హులై ఉంటారు. నేను ఇప్పుడు దరఖాస్తు చేస్తున్నాను.",
    apply_success: "{message}. దరఖాస్తు నంబర్: {id}",
    not_eligible: "పరిస్థితి ప్రకారం మీరు అర్హులు కాకపోవచ్చు. నేను ప్రత్యామ్నాయ పథకాలను వెతుకుతాను.",
    recommend: "సిఫారసు: {name} - {desc}",
    elicit_prompt: "Enter {field} (Telugu / numeric): ",
};

impl MessageCatalog {
    pub fn for_locale(locale: Locale) -> &'static Self {
        match locale {
            Locale::Te => &TELUGU,
            Locale::Mr | Locale::Unknown => &MARATHI,
        }
    }

    pub fn no_scheme(&self) -> &'static str {
        self.no_scheme
    }

    pub fn ask_field(&self, field: &str) -> String {
        self.ask_field.replace("{field}", field)
    }

    pub fn apply_start(&self, scheme_name: &str) -> String {
        self.apply_start.replace("{scheme}", scheme_name)
    }

    pub fn apply_success(&self, message: &str, application_id: &str) -> String {
        self.apply_success
            .replace("{message}", message)
            .replace("{id}", application_id)
    }

    pub fn not_eligible(&self) -> &'static str {
        self.not_eligible
    }

    pub fn recommend(&self, name: &str, description: &str) -> String {
        self.recommend
            .replace("{name}", name)
            .replace("{desc}", description)
    }

    pub fn elicit_prompt(&self, field: &str) -> String {
        self.elicit_prompt.replace("{field}", field)
    }
}
