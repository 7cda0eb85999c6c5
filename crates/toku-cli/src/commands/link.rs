//! `toku link` - Print a shareable meeting link.

use toku_core::{MeetingLinks, TokuConfig};

pub fn run(config: &TokuConfig, meeting_id: &str, personal: bool) {
    let links = MeetingLinks::new(config.links.resolve_base_url());
    println!("{}", link_for(&links, meeting_id, personal));
}

fn link_for(links: &MeetingLinks, meeting_id: &str, personal: bool) -> String {
    if personal {
        links.personal_room_url(meeting_id)
    } else {
        links.meeting_url(meeting_id)
    }
}
