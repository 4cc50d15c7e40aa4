use crate::acq_event::AdcEvent;
use crate::gradient_event::{Channel, GradEvent};
use crate::rf_event::RfEvent;
use crate::SeqError;

/// pure wait
#[derive(Clone,Debug)]
pub struct Delay {
    pub delay:f64
}

impl Delay {
    pub fn new(delay:f64) -> Result<Self,SeqError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SeqError::InvalidDelay(delay));
        }
        Ok(Self{delay})
    }
}

#[derive(Clone,Debug)]
pub enum Event {
    Rf(RfEvent),
    Grad(GradEvent),
    Adc(AdcEvent),
    Delay(Delay),
}

impl Event {
    pub fn duration(&self) -> f64 {
        match self {
            Event::Rf(rf) => rf.duration(),
            Event::Grad(g) => g.duration(),
            Event::Adc(adc) => adc.duration(),
            Event::Delay(d) => d.delay,
        }
    }
    pub fn label(&self) -> String {
        match self {
            Event::Rf(_) => String::from("rf"),
            Event::Grad(g) => format!("g{}",g.channel.axis()),
            Event::Adc(_) => String::from("adc"),
            Event::Delay(_) => String::from("delay"),
        }
    }
}

impl From<RfEvent> for Event {
    fn from(rf:RfEvent) -> Self {
        Event::Rf(rf)
    }
}

impl From<GradEvent> for Event {
    fn from(g:GradEvent) -> Self {
        Event::Grad(g)
    }
}

impl From<AdcEvent> for Event {
    fn from(adc:AdcEvent) -> Self {
        Event::Adc(adc)
    }
}

impl From<Delay> for Event {
    fn from(d:Delay) -> Self {
        Event::Delay(d)
    }
}

/// length of the longest event
pub fn calc_duration(events:&[Event]) -> f64 {
    events.iter().fold(0.0,|d,e| e.duration().max(d))
}

/// Events that play out simultaneously. A block holds at most one rf, one adc and one gradient
/// per channel
#[derive(Clone,Debug)]
pub struct Block {
    events:Vec<Event>,
    duration:f64,
}

impl Block {
    pub fn new(events:Vec<Event>) -> Result<Self,SeqError> {
        let mut channels = Vec::<Channel>::new();
        let mut n_rf = 0;
        let mut n_adc = 0;
        for e in events.iter() {
            match e {
                Event::Rf(_) => n_rf += 1,
                Event::Adc(_) => n_adc += 1,
                Event::Grad(g) => {
                    if channels.contains(&g.channel) {
                        return Err(SeqError::DuplicateEvent(format!("g{}",g.channel.axis())));
                    }
                    channels.push(g.channel);
                }
                Event::Delay(_) => {}
            }
        }
        if n_rf > 1 {return Err(SeqError::DuplicateEvent(String::from("rf")))}
        if n_adc > 1 {return Err(SeqError::DuplicateEvent(String::from("adc")))}
        let duration = calc_duration(&events);
        Ok(Self{events,duration})
    }
    pub fn duration(&self) -> f64 {
        self.duration
    }
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    pub fn rf(&self) -> Option<&RfEvent> {
        self.events.iter().find_map(|e| if let Event::Rf(rf) = e {Some(rf)} else {None})
    }
    pub fn adc(&self) -> Option<&AdcEvent> {
        self.events.iter().find_map(|e| if let Event::Adc(adc) = e {Some(adc)} else {None})
    }
    pub fn grad(&self,channel:Channel) -> Option<&GradEvent> {
        self.events.iter().find_map(|e| match e {
            Event::Grad(g) if g.channel == channel => Some(g),
            _ => None
        })
    }
}
