//! Built-in candidate label sets.

/// Descriptive prompts for Vietnamese landmarks, dishes and cultural objects,
/// paired with the short name returned to callers.
pub(crate) const VIETNAM_CULTURE: &[(&str, &str)] = &[
    ("a photo of Hoan Kiem Lake in Hanoi", "Hoan Kiem Lake"),
    ("the One Pillar Pagoda in Hanoi, Vietnam", "One Pillar Pagoda"),
    ("the Temple of Literature, an ancient university in Hanoi", "Temple of Literature"),
    ("Long Bien Bridge, a historic steel bridge in Hanoi", "Long Bien Bridge"),
    ("Imperial Citadel of Thang Long, an ancient site in Hanoi", "Imperial Citadel of Thang Long"),
    ("a scenic view of Ha Long Bay with limestone karsts", "Ha Long Bay"),
    ("a boat ride through Trang An landscape complex", "Trang An"),
    ("Tam Coc river surrounded by rice fields and karst mountains", "Tam Coc"),
    ("a mountaintop view from Fansipan, the highest mountain in Vietnam", "Fansipan"),
    ("the Imperial City of Hue, a historical royal complex", "Imperial City of Hue"),
    ("Thien Mu Pagoda overlooking the Perfume River in Hue", "Thien Mu Pagoda"),
    ("Dragon Bridge in Da Nang lit up at night", "Dragon Bridge"),
    ("My Son Sanctuary, ancient Hindu temple ruins in Vietnam", "My Son Sanctuary"),
    ("Hoi An Ancient Town with lantern-lit streets", "Hoi An Ancient Town"),
    ("Phong Nha Ke Bang caves and karst mountains", "Phong Nha Ke Bang"),
    ("Dong Hoi Citadel, a historic Vietnamese fortress", "Dong Hoi Citadel"),
    ("Dai Noi Citadel, the main gate of the Imperial City", "Dai Noi Citadel"),
    ("Independence Palace, a landmark in Ho Chi Minh City", "Independence Palace"),
    ("Notre-Dame Cathedral of Saigon, a French colonial church", "Notre-Dame Cathedral"),
    ("Bitexco Tower, a modern skyscraper in Saigon", "Bitexco Tower"),
    ("Ben Thanh Market, a bustling market in Saigon", "Ben Thanh Market"),
    ("Turtle Lake roundabout in Ho Chi Minh City", "Turtle Lake"),
    ("Cao Dai Temple, a colorful religious site in Tay Ninh", "Cao Dai Temple"),
    ("Can Tho Bridge over the Mekong River", "Can Tho Bridge"),
    ("Tram Chim National Park with wetlands and birds", "Tram Chim National Park"),
    ("Ba Chua Xu Temple, a pilgrimage site in Chau Doc", "Ba Chua Xu Temple"),
    ("a bowl of Pho, Vietnamese noodle soup with herbs", "Pho"),
    ("a Banh Mi sandwich with pickled vegetables and pork", "Banh Mi"),
    ("Bun Cha, grilled pork with noodles and dipping sauce", "Bun Cha"),
    ("Com Tam, broken rice with grilled pork and egg", "Com Tam"),
    ("Banh Xeo, Vietnamese crispy pancakes with shrimp", "Banh Xeo"),
    ("Goi Cuon, fresh Vietnamese spring rolls", "Goi Cuon"),
    ("Cha Gio, crispy Vietnamese fried spring rolls", "Cha Gio"),
    ("Hu Tieu, Southern Vietnamese noodle soup", "Hu Tieu"),
    ("Mi Quang, turmeric noodles from Central Vietnam", "Mi Quang"),
    ("Che Ba Mau, three-color Vietnamese dessert", "Che Ba Mau"),
    ("Ca Phe Sua Da, iced Vietnamese coffee with milk", "Ca Phe Sua Da"),
    ("Banh Cuon, steamed rice rolls with minced pork", "Banh Cuon"),
    ("Banh Trang Tron, Vietnamese rice paper salad", "Banh Trang Tron"),
    ("Nem Nuong, grilled pork sausage with rice paper", "Nem Nuong"),
    ("Bun Bo Hue, spicy beef noodle soup from Hue", "Bun Bo Hue"),
    ("a Non La, traditional Vietnamese conical hat", "Non La"),
    ("a person wearing an Ao Dai, Vietnamese long dress", "Ao Dai"),
    ("a motorbike on a Vietnamese street", "Parked Motorbike"),
    ("a red Lì Xì envelope used during Lunar New Year", "Lì Xì Envelope"),
    ("the national flag of the Socialist Republic of Vietnam, red with a yellow star", "Vietnam Flag"),
    ("a traditional Vietnamese lacquer painting, also known as sơn mài", "Lacquer Painting"),
    ("a plastic stool commonly seen on Vietnamese sidewalks (ghế nhựa)", "Plastic Stool"),
    ("a vintage Vietnamese thermos, also known as bình thủy", "Bình Thủy"),
    ("a Đông Hồ painting, a traditional Vietnamese folk artwork", "Đông Hồ Painting"),
    ("a street food cart selling hu tieu noodles (xe hủ tiếu gõ), often seen at night", "Hu Tieu Cart"),
    ("none of the above", "None of the above"),
];

/// Canonical landmark names, scored as-is.
pub(crate) const VIETNAM_LANDMARKS: &[&str] = &[
    "Hoan Kiem Lake",
    "One Pillar Pagoda",
    "Temple of Literature",
    "Long Bien Bridge",
    "Imperial Citadel of Thang Long",
    "Ha Long Bay",
    "Bai Dinh Pagoda",
    "Trang An",
    "Tam Coc",
    "Fansipan",
    "Imperial City of Hue",
    "Thien Mu Pagoda",
    "Dragon Bridge",
    "My Son Sanctuary",
    "Hoi An Ancient Town",
    "Japanese Bridge",
    "Phong Nha Ke Bang",
    "Dong Hoi Citadel",
    "Dai Noi Citadel",
    "Independence Palace",
    "Notre-Dame Cathedral of Saigon",
    "Bitexco Tower",
    "Ben Thanh Market",
    "Turtle Lake",
    "Cu Chi Tunnels",
    "Ba Den Mountain",
    "Cao Dai Temple",
    "Can Tho Bridge",
    "Tram Chim National Park",
    "Ba Chua Xu Temple",
];
